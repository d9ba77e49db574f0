//! Error types for db-run.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for db-run operations.
#[derive(Error, Debug)]
pub enum DbRunError {
    /// An input file could not be read (missing, not a regular file, unreadable).
    /// Non-fatal: the offending file contributes nothing and the run continues.
    #[error("File read error: {0}")]
    FileRead(String),

    /// The connection URL scheme does not match any supported driver.
    /// Fatal, raised before any connection attempt.
    #[error("Unsupported driver: {0}")]
    UnsupportedDriver(String),

    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution errors (syntax errors, constraint violations, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// The run was interrupted externally during an inter-statement pause.
    #[error("Execution cancelled")]
    Cancelled,
}

impl DbRunError {
    /// Creates a file read error with the given message.
    pub fn file_read(msg: impl Into<String>) -> Self {
        Self::FileRead(msg.into())
    }

    /// Creates an unsupported driver error with the given message.
    pub fn unsupported_driver(msg: impl Into<String>) -> Self {
        Self::UnsupportedDriver(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::FileRead(_) => "File Read Error",
            Self::UnsupportedDriver(_) => "Unsupported Driver Error",
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Result type alias using DbRunError.
pub type Result<T> = std::result::Result<T, DbRunError>;
