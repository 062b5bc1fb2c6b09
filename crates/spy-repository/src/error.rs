//! Error types for the repository layer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors that can occur while reading the event store or the level catalog
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The event store answered with a non-success status, or could not be reached
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// The event store answered without a statements page
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid path provided
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A level file could not be read as a catalog entry
    #[error("Failed to parse catalog file {path}: {message}")]
    CatalogParse { path: PathBuf, message: String },

    /// Generic error
    #[error("Repository error: {0}")]
    Other(String),
}

impl RepositoryError {
    /// Whether the error means the learner's statements could not be obtained
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            RepositoryError::SourceUnavailable(_) | RepositoryError::InvalidResponse(_)
        )
    }
}
