//! Error types for configuration files and bundled resources.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, saving or materializing a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {message}")]
    ParseFailed { path: PathBuf, message: String },

    #[error("Failed to write config file '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize config for '{path}': {message}")]
    SerializeFailed { path: PathBuf, message: String },

    #[error("Bundled resource '{name}' not found")]
    ResourceNotFound { name: String },

    #[error("Invalid resource name '{name}'")]
    InvalidResourceName { name: String },

    #[error("Invalid config path '{key}': segments must be non-empty")]
    InvalidKey { key: String },

    #[error("Background execution requires a running tokio runtime")]
    NoRuntime,

    #[error("Background config task failed: {0}")]
    TaskFailed(String),
}

impl ConfigError {
    /// Returns true if the error came from parsing rather than I/O.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, ConfigError::ParseFailed { .. })
    }
}
