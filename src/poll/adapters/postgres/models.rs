//! Diesel row models for poll persistence.

use super::schema::{choices, questions};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for question records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuestionRow {
    /// Question identifier.
    pub id: uuid::Uuid,
    /// Prompt text.
    pub prompt: String,
    /// Publication timestamp.
    pub published_at: DateTime<Utc>,
}

/// Insert and update model for question records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = questions)]
pub struct NewQuestionRow {
    /// Question identifier.
    pub id: uuid::Uuid,
    /// Prompt text.
    pub prompt: String,
    /// Publication timestamp.
    pub published_at: DateTime<Utc>,
}

/// Query result row for choice records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = choices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChoiceRow {
    /// Choice identifier.
    pub id: uuid::Uuid,
    /// Owning question.
    pub question_id: uuid::Uuid,
    /// Answer text.
    pub label: String,
    /// Vote counter.
    pub vote_count: i32,
}

/// Insert model for choice records; `position` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = choices)]
pub struct NewChoiceRow {
    /// Choice identifier.
    pub id: uuid::Uuid,
    /// Owning question.
    pub question_id: uuid::Uuid,
    /// Answer text.
    pub label: String,
    /// Vote counter.
    pub vote_count: i32,
}
