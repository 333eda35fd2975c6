//! # Telemetry
//!
//! Installs the global `tracing` subscriber from a [`LogConfig`].
//!
//! Library code only emits events; applications call [`init_tracing`] once
//! at startup. `RUST_LOG` takes precedence over the configured level.
//!
//! ```no_run
//! use pg_coder::config::CoderConfig;
//! use pg_coder::telemetry::init_tracing;
//!
//! let config = CoderConfig::load()?;
//! init_tracing(&config.log)?;
//! # Ok::<(), pg_coder::config::ConfigError>(())
//! ```

use crate::config::{ConfigError, LogConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber with an env filter as the global default.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if the level is not a valid filter
/// directive, and `ConfigError::Tracing` if a global subscriber is already
/// installed.
pub fn init_tracing(config: &LogConfig) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ConfigError::InvalidValue {
            field: "log.level".to_string(),
            message: e.to_string(),
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.include_target);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    installed.map_err(|e| ConfigError::Tracing(e.to_string()))
}
