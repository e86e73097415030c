//! Choice record owned by a question.

use super::{ChoiceId, PollDomainError, PollText, QuestionId, VoteCount};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An answer option belonging to exactly one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    id: ChoiceId,
    question_id: QuestionId,
    text: PollText,
    vote_count: VoteCount,
}

/// Parameter object for reconstructing a persisted choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedChoiceData {
    /// Persisted choice identifier.
    pub id: ChoiceId,
    /// Owning question.
    pub question_id: QuestionId,
    /// Persisted answer text.
    pub text: PollText,
    /// Persisted vote counter.
    pub vote_count: VoteCount,
}

impl Choice {
    /// Creates a choice with no votes for the given question.
    #[must_use]
    pub fn new(question_id: QuestionId, text: PollText) -> Self {
        Self {
            id: ChoiceId::new(),
            question_id,
            text,
            vote_count: VoteCount::ZERO,
        }
    }

    /// Reconstructs a choice from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedChoiceData) -> Self {
        Self {
            id: data.id,
            question_id: data.question_id,
            text: data.text,
            vote_count: data.vote_count,
        }
    }

    /// Returns the choice identifier.
    #[must_use]
    pub const fn id(&self) -> ChoiceId {
        self.id
    }

    /// Returns the owning question identifier.
    #[must_use]
    pub const fn question_id(&self) -> QuestionId {
        self.question_id
    }

    /// Returns the answer text.
    #[must_use]
    pub const fn text(&self) -> &PollText {
        &self.text
    }

    /// Returns the number of votes recorded so far.
    #[must_use]
    pub const fn vote_count(&self) -> VoteCount {
        self.vote_count
    }

    /// Replaces the answer text.
    pub fn relabel(&mut self, text: PollText) {
        self.text = text;
    }

    /// Overwrites the vote counter.
    pub const fn set_vote_count(&mut self, vote_count: VoteCount) {
        self.vote_count = vote_count;
    }

    /// Adds one vote.
    ///
    /// # Errors
    ///
    /// Returns [`PollDomainError::VoteCountOverflow`] when the counter is
    /// already at [`VoteCount::MAX`].
    pub fn record_vote(&mut self) -> Result<(), PollDomainError> {
        self.vote_count = self
            .vote_count
            .incremented()
            .ok_or(PollDomainError::VoteCountOverflow(self.id))?;
        Ok(())
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.text.fmt(f)
    }
}
