//! Core error types for petlog-core.
//!
//! Caller errors (unknown period selector, missing owner identity) are
//! rejected rather than guessed at; store failures carry enough context
//! for the engine to decide between fail-soft reads and hard write
//! failures.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for petlog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Unrecognized period selector
    #[error("invalid period selector: '{0}'")]
    InvalidPeriod(String),

    /// Required owner identity absent
    #[error("missing owner identity")]
    MissingOwner,

    /// Referenced entity absent when required
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Underlying store collaborator failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Store-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the database
    #[error("failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("store migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("store is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("failed to access data directory: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("invalid time range: end ({end_ms}) must not precede start ({start_ms})")]
    InvalidTimeRange { start_ms: i64, end_ms: i64 },

    /// Timestamp outside the representable calendar range
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    /// Invalid value
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
