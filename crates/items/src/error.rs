//! Error types for the items crate.

use thiserror::Error;

/// Errors that can occur while loading an item batch.
#[derive(Error, Debug)]
pub enum ItemLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A line of a JSON Lines file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A whole-document JSON batch couldn't be parsed
    #[error("Invalid item batch in {file}: {source}")]
    InvalidBatch {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ItemLoadError>;
