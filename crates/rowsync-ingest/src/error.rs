//! Ingestion error types. All of these are fatal: they fire before any
//! row reaches the store.

use thiserror::Error;

/// Errors raised while loading or validating a source file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source file could not be read.
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    /// Source file could not be parsed as CSV.
    #[error("failed to parse source: {0}")]
    Csv(#[from] csv::Error),

    /// Source contains no header row.
    #[error("source has no header row: {0}")]
    EmptySource(String),

    /// None of the configured identity columns exist in the source.
    #[error("source is missing identity column(s): expected one of {expected:?}")]
    MissingIdentityColumns {
        /// Identity field names that were searched for.
        expected: Vec<String>,
    },
}

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
