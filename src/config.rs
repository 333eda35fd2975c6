//! # Configuration
//!
//! Configuration loading for applications embedding the coder framework.
//!
//! Two sections are recognised: `log` configures the tracing subscriber
//! installed by [`init_tracing`](crate::telemetry::init_tracing), and
//! `defaults` holds the metadata a [`TypeMap`](crate::coder::TypeMap)
//! applies to coders it instantiates from classes.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later sources override earlier):
//! 1. Default values
//! 2. Configuration file (if exists)
//! 3. Environment variables (prefixed with `PG_CODER_`)
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `PG_CODER_CONFIG_FILE` | Configuration file path | `pg_coder.toml` |
//! | `PG_CODER_LOG_LEVEL` | Log level | `info` |
//! | `PG_CODER_LOG_FORMAT` | Log format (json/pretty) | `json` |
//! | `PG_CODER_FORMAT` | Default coder format (text/binary) | `text` |
//! | `PG_CODER_DELIMITER` | Default composite delimiter | `,` |
//! | `PG_CODER_NEEDS_QUOTATION` | Default quotation policy | `true` |
//!
//! # Examples
//!
//! ```
//! use pg_coder::config::CoderConfig;
//!
//! let config = CoderConfig::from_toml_str(
//!     r#"
//!     [defaults]
//!     delimiter = ";"
//!     needs_quotation = false
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.defaults.delimiter.as_byte(), b';');
//! assert_eq!(config.log.level, "info");
//! ```

use crate::domain::value_objects::{Delimiter, Format};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse configuration.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("invalid config value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// The global tracing subscriber could not be installed.
    #[error("failed to initialise tracing: {0}")]
    Tracing(String),
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (structured logging).
    #[default]
    Json,
    /// Pretty format (human-readable).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include target (module path) in logs.
    #[serde(default = "default_true")]
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Json,
            include_target: true,
        }
    }
}

// ============================================================================
// Coder Defaults
// ============================================================================

/// Metadata applied to coders instantiated by a type map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoderDefaults {
    /// Format for classes whose namespace does not fix one.
    #[serde(default)]
    pub format: Format,

    /// Element delimiter of composite coders.
    #[serde(default)]
    pub delimiter: Delimiter,

    /// Whether composite coders quote their elements.
    #[serde(default = "default_true")]
    pub needs_quotation: bool,
}

impl Default for CoderDefaults {
    fn default() -> Self {
        Self {
            format: Format::Text,
            delimiter: Delimiter::DEFAULT,
            needs_quotation: true,
        }
    }
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CoderConfig {
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Coder defaults.
    #[serde(default)]
    pub defaults: CoderDefaults,
}

impl CoderConfig {
    /// Loads configuration from environment variables and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let config_path =
            std::env::var("PG_CODER_CONFIG_FILE").unwrap_or_else(|_| "pg_coder.toml".to_string());

        if Path::new(&config_path).exists() {
            config = Self::from_file(&config_path)?;
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed TOML or invalid values,
    /// such as a delimiter longer than one byte.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    ///
    /// Values that do not parse are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Logging configuration
        if let Some(level) = lookup("PG_CODER_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(format) = lookup("PG_CODER_LOG_FORMAT") {
            self.log.format = match format.to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                _ => LogFormat::Json,
            };
        }

        // Coder defaults
        if let Some(format) = lookup("PG_CODER_FORMAT")
            && let Ok(f) = format.to_lowercase().parse()
        {
            self.defaults.format = f;
        }
        if let Some(delimiter) = lookup("PG_CODER_DELIMITER")
            && let Ok(d) = Delimiter::try_from(delimiter)
        {
            self.defaults.delimiter = d;
        }
        if let Some(quote) = lookup("PG_CODER_NEEDS_QUOTATION")
            && let Ok(q) = quote.to_lowercase().parse()
        {
            self.defaults.needs_quotation = q;
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log.level".to_string(),
                message: format!(
                    "invalid log level '{}', must be one of: {:?}",
                    self.log.level, valid_levels
                ),
            });
        }

        Ok(())
    }
}

// ============================================================================
// Default Value Functions
// ============================================================================

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
