//! Public-facing poll queries and voting.

use crate::poll::{
    domain::{Choice, ChoiceId, Question, QuestionId},
    ports::{PollRepository, PollRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{PollServiceError, PollServiceResult};

/// Number of questions shown on the index page unless configured otherwise.
pub const DEFAULT_INDEX_LIMIT: usize = 5;

/// A published question together with its choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDetail {
    /// The question.
    pub question: Question,
    /// Its choices in creation order.
    pub choices: Vec<Choice>,
}

/// Result of a vote submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote was counted; carries the updated choice.
    Recorded(Choice),
    /// No choice was submitted, or it does not belong to the question.
    NoChoiceSelected(QuestionDetail),
}

/// Read and vote operations over published questions.
#[derive(Clone)]
pub struct PollCatalogueService<R, C>
where
    R: PollRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    index_limit: usize,
}

impl<R, C> PollCatalogueService<R, C>
where
    R: PollRepository,
    C: Clock + Send + Sync,
{
    /// Creates a catalogue service showing [`DEFAULT_INDEX_LIMIT`] questions
    /// on the index.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            index_limit: DEFAULT_INDEX_LIMIT,
        }
    }

    /// Overrides how many questions [`Self::latest_questions`] returns.
    #[must_use]
    pub const fn with_index_limit(mut self, index_limit: usize) -> Self {
        self.index_limit = index_limit;
        self
    }

    /// Returns every question published at or before now, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::Repository`] when the listing fails.
    pub async fn published_questions(&self) -> PollServiceResult<Vec<Question>> {
        let now = self.clock.utc();
        Ok(self.repository.list_published(now, None).await?)
    }

    /// Returns the newest published questions, capped at the index limit.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::Repository`] when the listing fails.
    pub async fn latest_questions(&self) -> PollServiceResult<Vec<Question>> {
        let now = self.clock.utc();
        let questions = self
            .repository
            .list_published(now, Some(self.index_limit))
            .await?;
        debug!(count = questions.len(), "listed latest questions");
        Ok(questions)
    }

    /// Looks up a published question and its choices.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::QuestionNotFound`] when the question does
    /// not exist or its publication time is still in the future.
    pub async fn question_detail(&self, id: QuestionId) -> PollServiceResult<QuestionDetail> {
        let question = self.published_question(id).await?;
        let choices = self.repository.choices_for(id).await?;
        Ok(QuestionDetail { question, choices })
    }

    /// Looks up a published question with its current vote counts.
    ///
    /// Visibility follows [`Self::question_detail`].
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::QuestionNotFound`] when the question is
    /// missing or unpublished.
    pub async fn question_results(&self, id: QuestionId) -> PollServiceResult<QuestionDetail> {
        self.question_detail(id).await
    }

    /// Records a vote for `choice_id` on a published question.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::QuestionNotFound`] when the question is
    /// missing or unpublished, and [`PollServiceError::Repository`] when the
    /// increment fails.
    pub async fn vote(
        &self,
        question_id: QuestionId,
        choice_id: Option<ChoiceId>,
    ) -> PollServiceResult<VoteOutcome> {
        let detail = self.question_detail(question_id).await?;
        let Some(selected) = choice_id.filter(|id| {
            detail.choices.iter().any(|choice| choice.id() == *id)
        }) else {
            debug!(%question_id, "vote submitted without a valid choice");
            return Ok(VoteOutcome::NoChoiceSelected(detail));
        };

        match self.repository.record_vote(selected).await {
            Ok(choice) => {
                info!(%question_id, choice_id = %selected, votes = %choice.vote_count(), "vote recorded");
                Ok(VoteOutcome::Recorded(choice))
            }
            // Deleted between lookup and increment.
            Err(PollRepositoryError::ChoiceNotFound(_)) => {
                let refreshed = self.question_detail(question_id).await?;
                Ok(VoteOutcome::NoChoiceSelected(refreshed))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn published_question(&self, id: QuestionId) -> PollServiceResult<Question> {
        let now = self.clock.utc();
        match self.repository.find_question(id).await? {
            Some(question) if question.is_published_at(now) => Ok(question),
            Some(_) | None => {
                warn!(question_id = %id, "question missing or not yet published");
                Err(PollServiceError::QuestionNotFound(id))
            }
        }
    }
}
