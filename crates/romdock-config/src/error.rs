//! Error types for settings management

use romdock_types::Error as RomdockError;
use std::path::PathBuf;
use thiserror::Error;

/// Settings error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error when reading or writing the settings file
    #[error("I/O error on settings file '{path}': {source}")]
    Io {
        /// Path to the settings file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Settings file parsing error
    #[error("Failed to parse settings file '{path}': {message}")]
    Parse {
        /// Path to the settings file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },

    /// No profile with the given identifier exists
    #[error("Unknown sync profile: {id}")]
    UnknownProfile {
        /// The identifier that matched nothing
        id: String,
    },

    /// No platform data directory could be determined
    #[error("No data directory available on this platform")]
    NoDataDir,
}

impl From<toml::ser::Error> for ConfigError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}

impl From<ConfigError> for RomdockError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::UnknownProfile { id } => RomdockError::ProfileNotFound { id },
            other => RomdockError::config(other.to_string()),
        }
    }
}

/// Result type for settings operations
pub type ConfigResult<T> = Result<T, ConfigError>;
