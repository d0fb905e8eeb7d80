//! Core error types for studyflow-core.
//!
//! This module defines the error hierarchy using thiserror so that every
//! fallible operation in the library reports a typed, printable error.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Datastore-related errors
    #[error("Datastore error: {0}")]
    Datastore(#[from] DatastoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Datastore-specific errors.
#[derive(Error, Debug)]
pub enum DatastoreError {
    /// Failed to open the backing database
    #[error("Failed to open datastore at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Datastore migration failed: {0}")]
    MigrationFailed(String),

    /// Write attempted without a resolved user
    #[error("Not authenticated: no current user")]
    NotAuthenticated,

    /// Referenced row does not exist
    #[error("No {entity} with id '{id}'")]
    NotFound { entity: &'static str, id: String },

    /// Database is locked
    #[error("Datastore is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
///
/// Raised before any write is attempted; each variant names the offending
/// field so callers can surface a field-specific message.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Required text field is empty or whitespace
    #[error("'{field}' must not be empty")]
    EmptyField { field: &'static str },

    /// Date field lies in the past
    #[error("'{field}' must not be in the past (got {date})")]
    DateInPast {
        field: &'static str,
        date: chrono::NaiveDate,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}

impl From<rusqlite::Error> for DatastoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatastoreError::Locked
                } else {
                    DatastoreError::QueryFailed(err.to_string())
                }
            }
            _ => DatastoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
