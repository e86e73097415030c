//! Admin form bodies and their field parsing.
//!
//! Publication times are entered as UTC in the `datetime-local` layout
//! (`2026-10-01T12:00` or `2026-10-01T12:00:30`); RFC 3339 with an explicit
//! offset is accepted too. A blank field means "unchanged" on the change form
//! and "now" on the add form.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Layout used to pre-fill `datetime-local` inputs.
pub const FORM_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const MINUTE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Field values an admin form could not interpret.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FormError {
    /// The publication time is not a recognised timestamp.
    #[error("Enter a valid date and time, such as 2026-10-01T12:00.")]
    InvalidPublicationTime,

    /// The vote count is not a whole, non-negative number.
    #[error("Enter a whole number of votes.")]
    InvalidVoteCount,
}

/// Question add and change form.
///
/// Decoded from raw pairs because the add form repeats the `choice` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionForm {
    /// Prompt text as submitted.
    pub text: String,
    /// Publication time as submitted.
    pub published_at: String,
    /// Every `choice` field in submission order, blanks included.
    pub choices: Vec<String>,
}

impl QuestionForm {
    /// Collects the known fields from a decoded form body.
    #[must_use]
    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (name, value) in fields {
            match name.as_str() {
                "text" => form.text = value,
                "published_at" => form.published_at = value,
                "choice" => form.choices.push(value),
                _ => {}
            }
        }
        form
    }

    /// Parses the publication time; `None` when the field was left blank.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidPublicationTime`] for unparseable input.
    pub fn publication_time(&self) -> Result<Option<DateTime<Utc>>, FormError> {
        parse_publication_time(&self.published_at)
    }

    /// Choice texts that were filled in. Blank slots are skipped.
    #[must_use]
    pub fn filled_choices(&self) -> Vec<String> {
        self.choices
            .iter()
            .filter(|value| !value.trim().is_empty())
            .cloned()
            .collect()
    }
}

/// Choice add and change form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceForm {
    /// Answer text.
    #[serde(default)]
    pub text: String,
    /// Vote count; only present on the change form.
    #[serde(default)]
    pub votes: Option<String>,
}

impl ChoiceForm {
    /// Parses the vote count; `None` when absent or blank.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidVoteCount`] for anything but a
    /// non-negative integer.
    pub fn vote_count(&self) -> Result<Option<u64>, FormError> {
        let Some(raw) = self.votes.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<u64>()
            .map(Some)
            .map_err(|_| FormError::InvalidVoteCount)
    }
}

/// Parses a submitted publication time as UTC.
///
/// # Errors
///
/// Returns [`FormError::InvalidPublicationTime`] when no accepted layout
/// matches.
pub fn parse_publication_time(raw: &str) -> Result<Option<DateTime<Utc>>, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(with_offset.with_timezone(&Utc)));
    }
    [FORM_TIMESTAMP_FORMAT, MINUTE_TIMESTAMP_FORMAT]
        .into_iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(trimmed, layout).ok())
        .map(|naive| Some(naive.and_utc()))
        .ok_or(FormError::InvalidPublicationTime)
}
