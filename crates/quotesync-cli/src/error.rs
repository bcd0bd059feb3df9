use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] quotesync_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No quote text provided")]
    EmptyText,
    #[error("Quote ID cannot be empty")]
    EmptyQuoteId,
    #[error("Invalid quote ID: {0}")]
    InvalidQuoteId(String),
    #[error("No quotes available")]
    NoQuotes,
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
