//! Centralized error types for the core crate.
//!
//! Network-facing errors live with the client in `wxduel-meteo`; this module
//! covers configuration and persistence failures.

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to write config file: {0}")]
    Write(#[source] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// User-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoConfigDir => "Could not find a configuration directory on this system.",
            Self::Read(_) | Self::Write(_) => "A configuration file operation failed.",
            Self::Parse(_) | Self::Serialize(_) => "The configuration file is not valid TOML.",
            Self::Invalid(_) => "The configuration contains invalid values.",
        }
    }
}

/// Persistent storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write key {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create storage directory: {0}")]
    CreateDir(#[source] std::io::Error),

    #[error("Failed to serialize value for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// User-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        "Saving local data failed. Check disk space and permissions."
    }
}
