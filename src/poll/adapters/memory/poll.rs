//! In-memory repository for questions and choices.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::poll::{
    domain::{Choice, ChoiceId, Question, QuestionId},
    ports::{CascadeDeletion, PollRepository, PollRepositoryError, PollRepositoryResult},
};

/// Thread-safe in-memory poll repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPollRepository {
    state: Arc<RwLock<InMemoryPollState>>,
}

#[derive(Debug, Default)]
struct InMemoryPollState {
    questions: HashMap<QuestionId, Question>,
    choices: HashMap<ChoiceId, Choice>,
    // Creation-ordered choice IDs per question.
    choice_index: HashMap<QuestionId, Vec<ChoiceId>>,
}

impl InMemoryPollRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PollRepositoryResult<RwLockReadGuard<'_, InMemoryPollState>> {
        self.state.read().map_err(|err| {
            PollRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> PollRepositoryResult<RwLockWriteGuard<'_, InMemoryPollState>> {
        self.state.write().map_err(|err| {
            PollRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Sorts questions newest first, breaking ties by identifier.
fn sort_newest_first(questions: &mut [Question]) {
    questions.sort_by(|left, right| {
        right
            .publication_time()
            .cmp(&left.publication_time())
            .then_with(|| left.id().cmp(&right.id()))
    });
}

fn text_matches(question: &Question, needle: &str) -> bool {
    question
        .text()
        .as_str()
        .to_lowercase()
        .contains(&needle.to_lowercase())
}

#[async_trait]
impl PollRepository for InMemoryPollRepository {
    async fn store_question(&self, question: &Question) -> PollRepositoryResult<()> {
        let mut state = self.write()?;
        if state.questions.contains_key(&question.id()) {
            return Err(PollRepositoryError::DuplicateQuestion(question.id()));
        }
        state.questions.insert(question.id(), question.clone());
        state.choice_index.entry(question.id()).or_default();
        Ok(())
    }

    async fn store_question_with_choices(
        &self,
        question: &Question,
        choices: &[Choice],
    ) -> PollRepositoryResult<()> {
        let question_id = question.id();
        let mut state = self.write()?;
        if state.questions.contains_key(&question_id) {
            return Err(PollRepositoryError::DuplicateQuestion(question_id));
        }
        for (position, choice) in choices.iter().enumerate() {
            if choice.question_id() != question_id {
                return Err(PollRepositoryError::QuestionNotFound(choice.question_id()));
            }
            let repeated = choices
                .iter()
                .take(position)
                .any(|earlier| earlier.id() == choice.id());
            if repeated || state.choices.contains_key(&choice.id()) {
                return Err(PollRepositoryError::DuplicateChoice(choice.id()));
            }
        }

        state.questions.insert(question_id, question.clone());
        state
            .choice_index
            .insert(question_id, choices.iter().map(Choice::id).collect());
        for choice in choices {
            state.choices.insert(choice.id(), choice.clone());
        }
        Ok(())
    }

    async fn update_question(&self, question: &Question) -> PollRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .questions
            .get_mut(&question.id())
            .ok_or(PollRepositoryError::QuestionNotFound(question.id()))?;
        *stored = question.clone();
        Ok(())
    }

    async fn find_question(&self, id: QuestionId) -> PollRepositoryResult<Option<Question>> {
        let state = self.read()?;
        Ok(state.questions.get(&id).cloned())
    }

    async fn list_published(
        &self,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> PollRepositoryResult<Vec<Question>> {
        let state = self.read()?;
        let mut published: Vec<Question> = state
            .questions
            .values()
            .filter(|question| question.is_published_at(now))
            .cloned()
            .collect();
        sort_newest_first(&mut published);
        if let Some(limit) = limit {
            published.truncate(limit);
        }
        Ok(published)
    }

    async fn list_questions(&self, search: Option<&str>) -> PollRepositoryResult<Vec<Question>> {
        let state = self.read()?;
        let mut questions: Vec<Question> = state
            .questions
            .values()
            .filter(|question| search.is_none_or(|needle| text_matches(question, needle)))
            .cloned()
            .collect();
        sort_newest_first(&mut questions);
        Ok(questions)
    }

    async fn delete_question(&self, id: QuestionId) -> PollRepositoryResult<CascadeDeletion> {
        let mut state = self.write()?;
        if !state.questions.contains_key(&id) {
            return Err(PollRepositoryError::QuestionNotFound(id));
        }

        let removed_choices = state.choice_index.remove(&id).unwrap_or_default();
        for choice_id in &removed_choices {
            state.choices.remove(choice_id);
        }
        state.questions.remove(&id);

        Ok(CascadeDeletion {
            question_id: id,
            removed_choices,
        })
    }

    async fn store_choice(&self, choice: &Choice) -> PollRepositoryResult<()> {
        let mut state = self.write()?;
        if state.choices.contains_key(&choice.id()) {
            return Err(PollRepositoryError::DuplicateChoice(choice.id()));
        }
        let question_id = choice.question_id();
        if !state.questions.contains_key(&question_id) {
            return Err(PollRepositoryError::QuestionNotFound(question_id));
        }

        state
            .choice_index
            .entry(question_id)
            .or_default()
            .push(choice.id());
        state.choices.insert(choice.id(), choice.clone());
        Ok(())
    }

    async fn update_choice(&self, choice: &Choice) -> PollRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .choices
            .get_mut(&choice.id())
            .ok_or(PollRepositoryError::ChoiceNotFound(choice.id()))?;
        // The owner is fixed at creation; only text and votes change.
        if stored.question_id() != choice.question_id() {
            return Err(PollRepositoryError::ChoiceNotFound(choice.id()));
        }
        *stored = choice.clone();
        Ok(())
    }

    async fn find_choice(&self, id: ChoiceId) -> PollRepositoryResult<Option<Choice>> {
        let state = self.read()?;
        Ok(state.choices.get(&id).cloned())
    }

    async fn choices_for(&self, question_id: QuestionId) -> PollRepositoryResult<Vec<Choice>> {
        let state = self.read()?;
        let choices = state
            .choice_index
            .get(&question_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.choices.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(choices)
    }

    async fn count_choices(
        &self,
        question_ids: &[QuestionId],
    ) -> PollRepositoryResult<HashMap<QuestionId, usize>> {
        let state = self.read()?;
        Ok(question_ids
            .iter()
            .filter_map(|id| {
                state
                    .choice_index
                    .get(id)
                    .filter(|choice_ids| !choice_ids.is_empty())
                    .map(|choice_ids| (*id, choice_ids.len()))
            })
            .collect())
    }

    async fn delete_choice(&self, id: ChoiceId) -> PollRepositoryResult<()> {
        let mut state = self.write()?;
        let choice = state
            .choices
            .remove(&id)
            .ok_or(PollRepositoryError::ChoiceNotFound(id))?;
        if let Some(ids) = state.choice_index.get_mut(&choice.question_id()) {
            ids.retain(|choice_id| *choice_id != id);
        }
        Ok(())
    }

    async fn record_vote(&self, id: ChoiceId) -> PollRepositoryResult<Choice> {
        let mut state = self.write()?;
        let choice = state
            .choices
            .get_mut(&id)
            .ok_or(PollRepositoryError::ChoiceNotFound(id))?;
        choice
            .record_vote()
            .map_err(|_| PollRepositoryError::VoteCountOverflow(id))?;
        Ok(choice.clone())
    }
}
