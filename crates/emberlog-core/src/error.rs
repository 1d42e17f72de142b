//! Core error types for emberlog-core.
//!
//! Local reads deliberately have no error type: missing or undecodable
//! data degrades to an empty/default value so a check-in can always
//! proceed. Everything that genuinely can fail (local writes, the remote
//! mirror, configuration) gets its own thiserror enum below.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for emberlog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Local persistence write failures
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Remote mirror failures
    #[error("Remote error: {0}")]
    Remote(#[from] crate::remote::RemoteError),

    /// Configuration failures
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Device identity failures
    #[error("Device identity error: {0}")]
    Device(#[from] crate::device::DeviceIdError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Local persistence errors. Only the write path produces these.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create or reach the data directory
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a blob to disk
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode a value before writing
    #[error("Failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file exists but cannot be parsed
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Config cannot be serialized or written
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key is not one of the known settings
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Value cannot be parsed for the given key
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
