//! Core error types for focusdeck-core.
//!
//! Every public Task Engine operation resolves to a `Result` carrying one of
//! these descriptors; nothing panics across the API boundary. The Pomodoro
//! Engine has no error path at all -- its inputs are closed enums and fixed
//! constants.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusdeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed task fields, caught locally before any remote call.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No resolvable owner -- task creation/mutation is blocked.
    #[error("not authorized: no resolvable owner")]
    Authorization,

    /// Remote store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Referenced task is not in the in-memory list.
    #[error("unknown task: {0}")]
    UnknownTask(String),

    /// Configuration-related errors.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local database errors.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value for a field.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Out of bounds access into a task-owned collection.
    #[error("index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },
}

impl ValidationError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Remote store errors.
///
/// All of these are recoverable from the caller's point of view: the
/// optimistic local copy stays as applied and a full reload is the
/// resynchronization path.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport-level failure (connection refused, timeout, bad URL).
    #[error("request failed: {0}")]
    Request(String),

    /// The store rejected the operation.
    #[error("store rejected the operation (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The store does not know one of the submitted columns.
    /// Triggers a narrowed retry with the guaranteed-stable field subset.
    #[error("store schema out of date: {0}")]
    SchemaDrift(String),

    /// No remote store endpoint is configured.
    #[error("remote store not configured")]
    NotConfigured,
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Request(err.to_string())
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration.
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration.
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key.
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not determine the configuration directory.
    #[error("could not determine the configuration directory")]
    NoConfigDir,
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection.
    #[error("failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Database is locked.
    #[error("database is locked")]
    Locked,
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
