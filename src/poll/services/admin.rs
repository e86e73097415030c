//! Administrative question and choice management.

use crate::poll::{
    domain::{Choice, ChoiceId, PollText, Question, QuestionId, VoteCount},
    ports::{CascadeDeletion, PollRepository},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

use super::{PollServiceError, PollServiceResult, QuestionDetail};

/// Request payload for creating a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateQuestionRequest {
    text: String,
    publication_time: Option<DateTime<Utc>>,
    choices: Vec<String>,
}

impl CreateQuestionRequest {
    /// Creates a request published at the service clock's current instant.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            publication_time: None,
            choices: Vec::new(),
        }
    }

    /// Sets an explicit publication time (past or future).
    #[must_use]
    pub const fn published_at(mut self, publication_time: DateTime<Utc>) -> Self {
        self.publication_time = Some(publication_time);
        self
    }

    /// Sets the initial choice texts.
    #[must_use]
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = String>) -> Self {
        self.choices = choices.into_iter().collect();
        self
    }
}

/// Partial update for a question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateQuestionRequest {
    /// New prompt text.
    pub text: Option<String>,
    /// New publication time.
    pub publication_time: Option<DateTime<Utc>>,
}

/// Partial update for a choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateChoiceRequest {
    /// New answer text.
    pub text: Option<String>,
    /// New vote count.
    pub vote_count: Option<u64>,
}

/// One row of the administrative question list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSummary {
    /// The question.
    pub question: Question,
    /// Whether the question was published within the last day.
    pub published_recently: bool,
    /// Number of choices the question owns.
    pub choice_count: usize,
}

/// A freshly created question with its initial choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedQuestion {
    /// The stored question.
    pub question: Question,
    /// The stored choices, in request order.
    pub choices: Vec<Choice>,
}

/// Administrative poll management service.
#[derive(Clone)]
pub struct PollAdminService<R, C>
where
    R: PollRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> PollAdminService<R, C>
where
    R: PollRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new admin service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a question and its initial choices.
    ///
    /// All texts are validated before anything is stored, and the question
    /// is stored together with its choices in one repository call.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::Domain`] when any text is invalid and
    /// [`PollServiceError::Repository`] when persistence fails.
    pub async fn create_question(
        &self,
        request: CreateQuestionRequest,
    ) -> PollServiceResult<CreatedQuestion> {
        let text = PollText::new(request.text)?;
        let choice_texts = request
            .choices
            .into_iter()
            .map(PollText::new)
            .collect::<Result<Vec<_>, _>>()?;

        let question = match request.publication_time {
            Some(publication_time) => Question::new(text, publication_time),
            None => Question::publish_now(text, &*self.clock),
        };
        let choices: Vec<Choice> = choice_texts
            .into_iter()
            .map(|choice_text| Choice::new(question.id(), choice_text))
            .collect();
        self.repository
            .store_question_with_choices(&question, &choices)
            .await?;

        info!(
            question_id = %question.id(),
            choices = choices.len(),
            "question created"
        );
        Ok(CreatedQuestion { question, choices })
    }

    /// Applies a partial update to a question.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::QuestionNotFound`] when the question does
    /// not exist and [`PollServiceError::Domain`] when the new text is invalid.
    pub async fn update_question(
        &self,
        id: QuestionId,
        request: UpdateQuestionRequest,
    ) -> PollServiceResult<Question> {
        let mut question = self.require_question(id).await?;
        if let Some(text) = request.text {
            question.rename(PollText::new(text)?);
        }
        if let Some(publication_time) = request.publication_time {
            question.reschedule(publication_time);
        }
        self.repository.update_question(&question).await?;
        info!(question_id = %id, "question updated");
        Ok(question)
    }

    /// Adds a choice to an existing question.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::Domain`] when the text is invalid and
    /// [`PollServiceError::Repository`] when the question does not exist.
    pub async fn add_choice(
        &self,
        question_id: QuestionId,
        text: impl Into<String>,
    ) -> PollServiceResult<Choice> {
        let choice = Choice::new(question_id, PollText::new(text)?);
        self.repository.store_choice(&choice).await?;
        info!(%question_id, choice_id = %choice.id(), "choice added");
        Ok(choice)
    }

    /// Applies a partial update to a choice.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::ChoiceNotFound`] when the choice does not
    /// exist and [`PollServiceError::Domain`] when a value is invalid.
    pub async fn update_choice(
        &self,
        id: ChoiceId,
        request: UpdateChoiceRequest,
    ) -> PollServiceResult<Choice> {
        let mut choice = self.choice(id).await?;
        if let Some(text) = request.text {
            choice.relabel(PollText::new(text)?);
        }
        if let Some(vote_count) = request.vote_count {
            choice.set_vote_count(VoteCount::new(vote_count)?);
        }
        self.repository.update_choice(&choice).await?;
        info!(choice_id = %id, "choice updated");
        Ok(choice)
    }

    /// Deletes a single choice and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::ChoiceNotFound`] when the choice does not
    /// exist and [`PollServiceError::Repository`] when persistence fails.
    pub async fn delete_choice(&self, id: ChoiceId) -> PollServiceResult<Choice> {
        let choice = self.choice(id).await?;
        self.repository.delete_choice(id).await?;
        info!(choice_id = %id, question_id = %choice.question_id(), "choice deleted");
        Ok(choice)
    }

    /// Looks up any question with its choices, whatever its publication time.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::QuestionNotFound`] when the question does
    /// not exist.
    pub async fn question(&self, id: QuestionId) -> PollServiceResult<QuestionDetail> {
        let question = self.require_question(id).await?;
        let choices = self.repository.choices_for(id).await?;
        Ok(QuestionDetail { question, choices })
    }

    /// Looks up a choice.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::ChoiceNotFound`] when the choice does not
    /// exist.
    pub async fn choice(&self, id: ChoiceId) -> PollServiceResult<Choice> {
        self.repository
            .find_choice(id)
            .await?
            .ok_or(PollServiceError::ChoiceNotFound(id))
    }

    /// Deletes a question and every choice it owns.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::Repository`] when the question does not
    /// exist or persistence fails.
    pub async fn delete_question(&self, id: QuestionId) -> PollServiceResult<CascadeDeletion> {
        let deletion = self.repository.delete_question(id).await?;
        info!(
            question_id = %id,
            removed_choices = deletion.removed_choices.len(),
            "question deleted"
        );
        Ok(deletion)
    }

    /// Lists all questions for administration, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`PollServiceError::Repository`] when the listing or the
    /// choice counts fail.
    pub async fn changelist(&self, search: Option<&str>) -> PollServiceResult<Vec<QuestionSummary>> {
        let now = self.clock.utc();
        let needle = search.map(str::trim).filter(|value| !value.is_empty());
        let questions = self.repository.list_questions(needle).await?;
        let question_ids: Vec<QuestionId> = questions.iter().map(Question::id).collect();
        let counts = self.repository.count_choices(&question_ids).await?;

        Ok(questions
            .into_iter()
            .map(|question| QuestionSummary {
                published_recently: question.was_published_recently_at(now),
                choice_count: counts.get(&question.id()).copied().unwrap_or_default(),
                question,
            })
            .collect())
    }

    async fn require_question(&self, id: QuestionId) -> PollServiceResult<Question> {
        self.repository
            .find_question(id)
            .await?
            .ok_or(PollServiceError::QuestionNotFound(id))
    }
}
