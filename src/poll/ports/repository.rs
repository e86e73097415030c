//! Repository port for question and choice persistence.

use crate::poll::domain::{Choice, ChoiceId, Question, QuestionId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Result type for poll repository operations.
pub type PollRepositoryResult<T> = Result<T, PollRepositoryError>;

/// Outcome of deleting a question together with the choices it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeDeletion {
    /// The deleted question.
    pub question_id: QuestionId,
    /// Choices removed because they belonged to the question.
    pub removed_choices: Vec<ChoiceId>,
}

/// Question and choice persistence contract.
#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Stores a new question.
    ///
    /// # Errors
    ///
    /// Returns [`PollRepositoryError::DuplicateQuestion`] when the identifier
    /// already exists.
    async fn store_question(&self, question: &Question) -> PollRepositoryResult<()>;

    /// Stores a new question together with its initial choices.
    ///
    /// Either the question and every choice are stored, or nothing is.
    /// Choices keep the order of the slice.
    ///
    /// # Errors
    ///
    /// Returns [`PollRepositoryError::DuplicateQuestion`] or
    /// [`PollRepositoryError::DuplicateChoice`] when an identifier already
    /// exists, and [`PollRepositoryError::QuestionNotFound`] when a choice
    /// names a different owner.
    async fn store_question_with_choices(
        &self,
        question: &Question,
        choices: &[Choice],
    ) -> PollRepositoryResult<()>;

    /// Persists changes to an existing question.
    ///
    /// # Errors
    ///
    /// Returns [`PollRepositoryError::QuestionNotFound`] when the question
    /// does not exist.
    async fn update_question(&self, question: &Question) -> PollRepositoryResult<()>;

    /// Finds a question by identifier, regardless of its publication time.
    ///
    /// Returns `None` when the question does not exist.
    async fn find_question(&self, id: QuestionId) -> PollRepositoryResult<Option<Question>>;

    /// Returns questions published at or before `now`, most recent first.
    ///
    /// Questions sharing a publication timestamp are ordered by identifier.
    /// When `limit` is set, at most that many questions are returned.
    async fn list_published(
        &self,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> PollRepositoryResult<Vec<Question>>;

    /// Returns every question, most recent publication first.
    ///
    /// When `search` is set, only questions whose text contains it
    /// (case-insensitively) are returned.
    async fn list_questions(&self, search: Option<&str>) -> PollRepositoryResult<Vec<Question>>;

    /// Deletes a question after deleting every choice that belongs to it.
    ///
    /// # Errors
    ///
    /// Returns [`PollRepositoryError::QuestionNotFound`] when the question
    /// does not exist; nothing is removed in that case.
    async fn delete_question(&self, id: QuestionId) -> PollRepositoryResult<CascadeDeletion>;

    /// Stores a new choice.
    ///
    /// # Errors
    ///
    /// Returns [`PollRepositoryError::QuestionNotFound`] when the owning
    /// question does not exist or [`PollRepositoryError::DuplicateChoice`]
    /// when the identifier already exists.
    async fn store_choice(&self, choice: &Choice) -> PollRepositoryResult<()>;

    /// Persists changes to an existing choice.
    ///
    /// # Errors
    ///
    /// Returns [`PollRepositoryError::ChoiceNotFound`] when the choice does
    /// not exist.
    async fn update_choice(&self, choice: &Choice) -> PollRepositoryResult<()>;

    /// Finds a choice by identifier.
    async fn find_choice(&self, id: ChoiceId) -> PollRepositoryResult<Option<Choice>>;

    /// Returns the choices of a question in creation order.
    async fn choices_for(&self, question_id: QuestionId) -> PollRepositoryResult<Vec<Choice>>;

    /// Counts the choices owned by each of the given questions.
    ///
    /// Questions without choices have no entry in the returned map.
    async fn count_choices(
        &self,
        question_ids: &[QuestionId],
    ) -> PollRepositoryResult<HashMap<QuestionId, usize>>;

    /// Deletes a single choice.
    ///
    /// # Errors
    ///
    /// Returns [`PollRepositoryError::ChoiceNotFound`] when the choice does
    /// not exist.
    async fn delete_choice(&self, id: ChoiceId) -> PollRepositoryResult<()>;

    /// Atomically adds one vote to a choice and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`PollRepositoryError::ChoiceNotFound`] when the choice does
    /// not exist or [`PollRepositoryError::VoteCountOverflow`] when the
    /// counter is saturated.
    async fn record_vote(&self, id: ChoiceId) -> PollRepositoryResult<Choice>;
}

/// Errors returned by poll repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PollRepositoryError {
    /// A question with the same identifier already exists.
    #[error("duplicate question identifier: {0}")]
    DuplicateQuestion(QuestionId),

    /// A choice with the same identifier already exists.
    #[error("duplicate choice identifier: {0}")]
    DuplicateChoice(ChoiceId),

    /// The question was not found.
    #[error("question not found: {0}")]
    QuestionNotFound(QuestionId),

    /// The choice was not found.
    #[error("choice not found: {0}")]
    ChoiceNotFound(ChoiceId),

    /// The vote counter cannot be incremented any further.
    #[error("vote counter overflow for choice {0}")]
    VoteCountOverflow(ChoiceId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PollRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
