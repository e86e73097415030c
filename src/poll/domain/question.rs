//! Question record and the publication-window rule.

use super::{PollText, QuestionId};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the "published recently" window ending at the current instant.
pub const PUBLICATION_WINDOW: TimeDelta = TimeDelta::days(1);

/// Returns `true` when `publication_time` lies in `[now - 1 day, now]`.
///
/// Both bounds are inclusive, so a question published exactly one day ago
/// still counts, while anything scheduled after `now` does not.
#[must_use]
pub fn within_publication_window(publication_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - PUBLICATION_WINDOW <= publication_time && publication_time <= now
}

/// A poll prompt with its publication timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    text: PollText,
    publication_time: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedQuestionData {
    /// Persisted question identifier.
    pub id: QuestionId,
    /// Persisted prompt text.
    pub text: PollText,
    /// Persisted publication timestamp.
    pub publication_time: DateTime<Utc>,
}

impl Question {
    /// Creates a question published at `publication_time`.
    ///
    /// Past and future timestamps are both accepted; a future timestamp
    /// schedules the question.
    #[must_use]
    pub fn new(text: PollText, publication_time: DateTime<Utc>) -> Self {
        Self {
            id: QuestionId::new(),
            text,
            publication_time,
        }
    }

    /// Creates a question published at the clock's current instant.
    #[must_use]
    pub fn publish_now(text: PollText, clock: &impl Clock) -> Self {
        Self::new(text, clock.utc())
    }

    /// Reconstructs a question from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedQuestionData) -> Self {
        Self {
            id: data.id,
            text: data.text,
            publication_time: data.publication_time,
        }
    }

    /// Returns the question identifier.
    #[must_use]
    pub const fn id(&self) -> QuestionId {
        self.id
    }

    /// Returns the prompt text.
    #[must_use]
    pub const fn text(&self) -> &PollText {
        &self.text
    }

    /// Returns the publication timestamp.
    #[must_use]
    pub const fn publication_time(&self) -> DateTime<Utc> {
        self.publication_time
    }

    /// Replaces the prompt text.
    pub fn rename(&mut self, text: PollText) {
        self.text = text;
    }

    /// Moves the publication timestamp.
    pub const fn reschedule(&mut self, publication_time: DateTime<Utc>) {
        self.publication_time = publication_time;
    }

    /// Returns `true` once the publication timestamp has been reached.
    #[must_use]
    pub fn is_published_at(&self, now: DateTime<Utc>) -> bool {
        self.publication_time <= now
    }

    /// Returns `true` when the question was published within the last day,
    /// measured against `now`.
    #[must_use]
    pub fn was_published_recently_at(&self, now: DateTime<Utc>) -> bool {
        within_publication_window(self.publication_time, now)
    }

    /// Returns `true` when the question was published within the last day,
    /// measured against the clock.
    #[must_use]
    pub fn was_published_recently(&self, clock: &impl Clock) -> bool {
        self.was_published_recently_at(clock.utc())
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.text.fmt(f)
    }
}
