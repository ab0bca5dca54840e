//! Logger builder implementation

#[macro_use]
mod format;

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format};
use crate::error::{LogError, LogResult};

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Returned once logging is set up.
///
/// The subscriber is global and stays installed for the rest of the
/// process; dropping the guard does not uninstall it.
#[derive(Debug, Default)]
#[must_use]
pub struct LoggerGuard(());

/// Build and install the subscriber for a given format layer.
macro_rules! init_subscriber {
    ($filter:expr, $fmt_layer:expr) => {
        Registry::default()
            .with($filter)
            .with($fmt_layer)
            .try_init()
            .map_err(|e| LogError::Init(e.to_string()))
    };
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Parse the filter without installing anything.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Filter`] when the directives do not parse.
    pub fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::Filter(format!("{}: {e}", self.config.level)))
    }

    /// Build and install the global subscriber
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Filter string cannot be parsed
    /// - A global subscriber is already installed
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = self.filter()?;
        let display = &self.config.display;

        match self.config.format {
            Format::Pretty => init_subscriber!(filter, create_fmt_layer!(pretty, display))?,
            Format::Compact => init_subscriber!(filter, create_fmt_layer!(compact, display))?,
            Format::Json => init_subscriber!(filter, create_json_layer!(display))?,
        }

        tracing::debug!(level = %self.config.level, format = ?self.config.format, "logger initialized");
        Ok(LoggerGuard::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_directives() {
        let builder = LoggerBuilder::from_config(Config {
            level: "quoteform=notalevel".into(),
            ..Config::default()
        });
        assert!(matches!(builder.filter(), Err(LogError::Filter(_))));
    }

    #[test]
    fn accepts_module_directives() {
        let builder = LoggerBuilder::from_config(Config {
            level: "warn,quoteform_rules=trace".into(),
            ..Config::default()
        });
        assert!(builder.filter().is_ok());
    }
}
