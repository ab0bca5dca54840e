//! Configuration presets for common scenarios

use super::{Config, DisplayConfig, Format};

/// Filter directives variable checked first
pub const LOG_ENV: &str = "QUOTEFORM_LOG";
/// Output format variable
pub const LOG_FORMAT_ENV: &str = "QUOTEFORM_LOG_FORMAT";

impl Config {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup(LOG_ENV).or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            config.format = Format::parse_lossy(&format);
        }
        if config.format == Format::Json {
            config.display.colors = false;
        }

        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                ..DisplayConfig::default()
            },
        }
    }

    /// Quiet configuration for command-line output (warnings only)
    #[must_use]
    pub fn cli() -> Self {
        Self {
            level: "warn".to_string(),
            format: Format::Compact,
            display: DisplayConfig {
                target: false,
                ..DisplayConfig::default()
            },
        }
    }
}
