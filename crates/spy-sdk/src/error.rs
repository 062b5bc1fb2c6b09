//! SDK error types

use spy_repository::RepositoryError;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Event store or catalog error
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Blank learner identifier
    #[error("Empty learner identifier")]
    EmptyIdentifier,
}

impl SdkError {
    /// Whether the learner's statements could not be obtained
    pub fn is_source_error(&self) -> bool {
        matches!(self, SdkError::Repository(e) if e.is_source_error())
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
