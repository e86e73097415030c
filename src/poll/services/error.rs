//! Error type shared by the poll services.

use crate::poll::{
    domain::{ChoiceId, PollDomainError, QuestionId},
    ports::PollRepositoryError,
};
use thiserror::Error;

/// Service-level errors for poll operations.
#[derive(Debug, Error)]
pub enum PollServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] PollDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] PollRepositoryError),

    /// The question does not exist or is not visible yet.
    #[error("question not found: {0}")]
    QuestionNotFound(QuestionId),

    /// The choice does not exist.
    #[error("choice not found: {0}")]
    ChoiceNotFound(ChoiceId),
}

impl PollServiceError {
    /// Returns `true` when the error means the requested record is absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::QuestionNotFound(_)
                | Self::ChoiceNotFound(_)
                | Self::Repository(
                    PollRepositoryError::QuestionNotFound(_) | PollRepositoryError::ChoiceNotFound(_)
                )
        )
    }
}

/// Result type for poll service operations.
pub type PollServiceResult<T> = Result<T, PollServiceError>;
