//! Library error type.

use std::path::PathBuf;

/// Errors that can occur while building a corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid pattern for category '{category}': {source}")]
    InvalidPattern {
        category: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid line pattern: {0}")]
    LinePattern(#[source] regex::Error),

    #[error("Invalid text pattern: {0}")]
    TextPattern(#[source] regex::Error),

    #[error("Invalid config file {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("{field} = {value} is out of range")]
    OutOfRange { field: &'static str, value: u64 },

    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, CorpusError>;
