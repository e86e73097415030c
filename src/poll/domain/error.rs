//! Error types for poll domain validation.

use super::ChoiceId;
use thiserror::Error;

/// Errors returned while constructing or mutating poll domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollDomainError {
    /// The question or choice text is empty after trimming.
    #[error("text must not be empty")]
    EmptyText,

    /// The question or choice text exceeds the persisted column width.
    #[error("text is {length} characters long, at most {max} are allowed")]
    TextTooLong {
        /// Length of the rejected value in characters.
        length: usize,
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// A vote count cannot be represented by the persisted integer column.
    #[error("vote count {0} is out of range")]
    VoteCountOutOfRange(u64),

    /// Recording another vote would overflow the vote counter.
    #[error("vote counter for choice {0} is saturated")]
    VoteCountOverflow(ChoiceId),
}
