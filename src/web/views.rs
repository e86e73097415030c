//! Template context models.

use crate::poll::{
    domain::{Choice, Question, QuestionId},
    services::{QuestionDetail, QuestionSummary},
};
use super::forms::{FORM_TIMESTAMP_FORMAT, QuestionForm};
use serde::Serialize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Message shown when a vote is submitted without a valid choice.
pub const NO_CHOICE_MESSAGE: &str = "You didn't select a choice.";

/// Blank choice inputs offered by the add-question form.
pub const BLANK_CHOICE_SLOTS: usize = 3;

/// Path of the admin question list.
pub const CHANGELIST_PATH: &str = "/admin/polls/question/";

const ADD_QUESTION_PATH: &str = "/admin/polls/question/add/";

/// Question fields exposed to templates.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    id: String,
    text: String,
    published_at: String,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id().to_string(),
            text: question.text().as_str().to_owned(),
            published_at: question
                .publication_time()
                .format(TIMESTAMP_FORMAT)
                .to_string(),
        }
    }
}

/// Choice fields exposed to templates.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceView {
    id: String,
    text: String,
    votes: u32,
}

impl From<&Choice> for ChoiceView {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id().to_string(),
            text: choice.text().as_str().to_owned(),
            votes: choice.vote_count().value(),
        }
    }
}

/// Context for the index page.
#[derive(Debug, Serialize)]
pub struct IndexPage {
    latest_question_list: Vec<QuestionView>,
}

impl IndexPage {
    /// Builds the index context from listed questions.
    #[must_use]
    pub fn new(questions: &[Question]) -> Self {
        Self {
            latest_question_list: questions.iter().map(QuestionView::from).collect(),
        }
    }
}

/// Context for the detail and results pages.
#[derive(Debug, Serialize)]
pub struct QuestionPage {
    question: QuestionView,
    choices: Vec<ChoiceView>,
    error_message: Option<&'static str>,
}

impl QuestionPage {
    /// Builds the context for a question and its choices.
    #[must_use]
    pub fn new(detail: &QuestionDetail) -> Self {
        Self {
            question: QuestionView::from(&detail.question),
            choices: detail.choices.iter().map(ChoiceView::from).collect(),
            error_message: None,
        }
    }

    /// Adds the "no choice selected" message.
    #[must_use]
    pub const fn with_missing_choice_error(mut self) -> Self {
        self.error_message = Some(NO_CHOICE_MESSAGE);
        self
    }
}

/// One row of the admin question list.
#[derive(Debug, Serialize)]
pub struct QuestionRowView {
    id: String,
    text: String,
    published_at: String,
    published_recently: bool,
    choice_count: usize,
}

/// Context for the admin question list.
#[derive(Debug, Serialize)]
pub struct AdminListPage {
    questions: Vec<QuestionRowView>,
    search: String,
}

impl AdminListPage {
    /// Builds the admin list context.
    #[must_use]
    pub fn new(summaries: &[QuestionSummary], search: Option<&str>) -> Self {
        let questions = summaries
            .iter()
            .map(|summary| {
                let view = QuestionView::from(&summary.question);
                QuestionRowView {
                    id: view.id,
                    text: view.text,
                    published_at: view.published_at,
                    published_recently: summary.published_recently,
                    choice_count: summary.choice_count,
                }
            })
            .collect();
        Self {
            questions,
            search: search.unwrap_or_default().to_owned(),
        }
    }
}

/// Path of the change form for a question.
#[must_use]
pub fn change_path(question_id: QuestionId) -> String {
    format!("{CHANGELIST_PATH}{question_id}/change/")
}

/// Context for the admin add and change forms.
#[derive(Debug, Serialize)]
pub struct QuestionFormPage {
    title: &'static str,
    action: String,
    question_id: Option<String>,
    text: String,
    published_at: String,
    choice_values: Vec<String>,
    choices: Vec<ChoiceView>,
    error_message: Option<String>,
}

impl QuestionFormPage {
    /// An empty add form.
    #[must_use]
    pub fn add() -> Self {
        Self {
            title: "Add question",
            action: ADD_QUESTION_PATH.to_owned(),
            question_id: None,
            text: String::new(),
            published_at: String::new(),
            choice_values: vec![String::new(); BLANK_CHOICE_SLOTS],
            choices: Vec::new(),
            error_message: None,
        }
    }

    /// The add form refilled with rejected input.
    #[must_use]
    pub fn add_with_input(form: &QuestionForm) -> Self {
        let mut choice_values = form.choices.clone();
        if choice_values.len() < BLANK_CHOICE_SLOTS {
            choice_values.resize(BLANK_CHOICE_SLOTS, String::new());
        }
        Self {
            text: form.text.clone(),
            published_at: form.published_at.clone(),
            choice_values,
            ..Self::add()
        }
    }

    /// The change form for a stored question and its choices.
    #[must_use]
    pub fn change(detail: &QuestionDetail) -> Self {
        Self {
            title: "Change question",
            action: change_path(detail.question.id()),
            text: detail.question.text().as_str().to_owned(),
            published_at: detail
                .question
                .publication_time()
                .format(FORM_TIMESTAMP_FORMAT)
                .to_string(),
            question_id: Some(detail.question.id().to_string()),
            choice_values: Vec::new(),
            choices: detail.choices.iter().map(ChoiceView::from).collect(),
            error_message: None,
        }
    }

    /// Replaces the question fields with rejected input.
    #[must_use]
    pub fn with_input(mut self, form: &QuestionForm) -> Self {
        self.text.clone_from(&form.text);
        self.published_at.clone_from(&form.published_at);
        self
    }

    /// Shows `message` above the form.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}
