//! Logging setup for quoteform.
//!
//! Library crates only emit `tracing` events; binaries pick a [`Config`]
//! and install a subscriber once at startup.
//!
//! ```no_run
//! let _guard = quoteform_log::auto_init(quoteform_log::Config::cli()).expect("logger");
//! tracing::info!(products = 3, "catalog loaded");
//! ```

#![forbid(unsafe_code)]

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format};
pub use config::presets::{LOG_ENV, LOG_FORMAT_ENV};
pub use error::{LogError, LogResult};

/// Install a subscriber configured from the environment when
/// `QUOTEFORM_LOG` or `RUST_LOG` is set, from `fallback` otherwise.
///
/// Returns without installing anything when a subscriber is already set.
///
/// # Errors
///
/// Returns [`LogError::Filter`] when the directives do not parse.
pub fn auto_init(fallback: Config) -> LogResult<LoggerGuard> {
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggerGuard::default());
    }

    if std::env::var_os(LOG_ENV).is_some() || std::env::var_os("RUST_LOG").is_some() {
        init_with(Config::from_env())
    } else {
        init_with(fallback)
    }
}

/// Initialize with custom configuration
///
/// # Errors
///
/// Fails when the filter does not parse or a subscriber is already
/// installed.
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}
