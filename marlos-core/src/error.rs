//! Error types for the Marlos core library.

use thiserror::Error;

/// Top-level error type for all local Marlos operations.
#[derive(Error, Debug)]
pub enum MarlosError {
    /// The knowledge base table is malformed.
    #[error("Invalid knowledge base entry #{index}: {reason}")]
    Knowledge {
        /// Position of the offending entry in table order.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// SQLite persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, MarlosError>;
