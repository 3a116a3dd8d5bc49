//! Error types for the concierge domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Answering a query never
//! fails; these errors only surface while the process is starting up.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for concierge startup operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Knowledge store errors ---
    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures while loading a knowledge file.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse knowledge file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Knowledge file at {path} contains no records")]
    Empty { path: PathBuf },

    #[error("Invalid knowledge record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}
