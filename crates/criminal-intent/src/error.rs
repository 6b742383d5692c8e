//! Error types for criminal-intent.
//!
//! This module defines all error types used throughout the crate. Absence of a
//! record is never an error; lookups return `Option` instead.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for criminal-intent operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Key-Value Store Errors ===
    /// Failed to open or create the backing database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database statement failed outside of a key read or write.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to initialize the key-value schema.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// The store could not read a key.
    #[error("failed to read key '{key}': {message}")]
    StoreRead {
        /// The key being read.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The store rejected a write or removal.
    #[error("failed to write key '{key}': {message}")]
    StoreWrite {
        /// The key being written.
        key: String,
        /// Description of what went wrong.
        message: String,
    },

    // === Record Errors ===
    /// The stored blob exists but does not have the expected shape.
    #[error("malformed data under key '{key}': {source}")]
    MalformedStorage {
        /// The key holding the blob.
        key: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A form draft failed validation before submission.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A date argument could not be parsed.
    #[error("invalid date '{input}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate {
        /// The text that failed to parse.
        input: String,
    },

    // === Theme Errors ===
    /// The requested theme id is not one of the available themes.
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for criminal-intent operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a store read error.
    #[must_use]
    pub fn store_read(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreRead {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a store write error.
    #[must_use]
    pub fn store_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreWrite {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error came from a rejected write.
    #[must_use]
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::StoreWrite { .. })
    }

    /// Check if this error means the stored blob could not be parsed.
    #[must_use]
    pub fn is_malformed_storage(&self) -> bool {
        matches!(self, Self::MalformedStorage { .. })
    }
}
