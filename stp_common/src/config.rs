//! TOML configuration loading shared by every planner binary.
//!
//! A configuration type derives `serde::Deserialize`, implements
//! [`Validate`] for its semantic rules, and is loaded through the blanket
//! [`ConfigLoader`] implementation:
//!
//! ```rust,no_run
//! use stp_common::config::{ConfigError, ConfigLoader, SharedConfig, Validate};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Debug, Deserialize)]
//! struct SimConfig {
//!     shared: SharedConfig,
//! }
//!
//! impl Validate for SimConfig {
//!     fn validate(&self) -> Result<(), ConfigError> {
//!         self.shared.validate()
//!     }
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = SimConfig::load_validated(Path::new("planner.toml"))?;
//!     println!("service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Error type for configuration loading and validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Configuration file not found at the given path.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// File could not be read or TOML parsing failed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log verbosity, lowercase in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Equivalent `tracing` level.
    pub const fn as_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

/// Fields common to every planner application configuration.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "stp-sim"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Reject an empty `service_name`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Semantic validation run after a configuration has been parsed.
pub trait Validate {
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Loading of configuration types from TOML files.
///
/// - `ConfigError::FileNotFound` if the file does not exist
/// - `ConfigError::ParseError` if it cannot be read or parsed
/// - `ConfigError::ValidationError` from [`ConfigLoader::load_validated`]
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Parse a configuration from TOML text.
    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load a configuration from a TOML file without semantic validation.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound(path.display().to_string())
            } else {
                ConfigError::ParseError(format!("{}: {e}", path.display()))
            }
        })?;
        debug!(path = %path.display(), bytes = content.len(), "read configuration file");
        Self::from_toml_str(&content)
    }

    /// Load and validate in one step.
    fn load_validated(path: &Path) -> Result<Self, ConfigError>
    where
        Self: Validate,
    {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
