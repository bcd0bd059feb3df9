//! Error types for quotesync-core

use thiserror::Error;

/// Result type alias using quotesync-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quotesync-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// A quote (or imported record) is missing a required field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Fetching from or pushing to the remote mirror failed
    #[error("Sync error: {0}")]
    Sync(String),

    /// Quote not found
    #[error("Quote not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Key-value storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error was caused by user input that failed validation.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this error aborted a sync cycle.
    pub const fn is_sync(&self) -> bool {
        matches!(self, Self::Sync(_))
    }
}
