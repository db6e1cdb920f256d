//! Error types for mol2db
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using Mol2DbError
pub type Result<T> = std::result::Result<T, Mol2DbError>;

/// Unified error type for mol2db operations
#[derive(Debug, Error)]
pub enum Mol2DbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("mol2 format error at line {line}: {message}")]
    Format { line: usize, message: String },

    // -------------------------------------------------------------------------
    // Compression Errors
    // -------------------------------------------------------------------------
    #[error("compression error: {0}")]
    Compression(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("store error: {0}")]
    Store(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("no records match filter: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Mol2DbError {
    /// Create a format error at a specific line
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        Mol2DbError::Format {
            line,
            message: message.into(),
        }
    }
}
