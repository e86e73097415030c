//! Identifier and validated scalar types for the poll domain.

use super::PollDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a question record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(Uuid);

impl QuestionId {
    /// Creates a new random question identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a question identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a choice record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceId(Uuid);

impl ChoiceId {
    /// Creates a new random choice identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a choice identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ChoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Question or choice text, trimmed and bounded to the column width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollText(String);

impl PollText {
    /// Maximum length in characters, matching the `VARCHAR(200)` columns.
    pub const MAX_CHARS: usize = 200;

    /// Creates validated poll text.
    ///
    /// # Errors
    ///
    /// Returns [`PollDomainError::EmptyText`] when the trimmed value is empty
    /// and [`PollDomainError::TextTooLong`] when it exceeds
    /// [`Self::MAX_CHARS`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, PollDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PollDomainError::EmptyText);
        }

        let length = trimmed.chars().count();
        if length > Self::MAX_CHARS {
            return Err(PollDomainError::TextTooLong {
                length,
                max: Self::MAX_CHARS,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the text as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PollText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PollText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of votes cast for a choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteCount(u32);

impl VoteCount {
    /// Largest count representable in the `INTEGER` vote column.
    pub const MAX: u32 = i32::MAX.unsigned_abs();

    /// Zero votes.
    pub const ZERO: Self = Self(0);

    /// Creates a validated vote count.
    ///
    /// # Errors
    ///
    /// Returns [`PollDomainError::VoteCountOutOfRange`] when the value
    /// exceeds [`Self::MAX`].
    pub fn new(value: u64) -> Result<Self, PollDomainError> {
        u32::try_from(value)
            .ok()
            .filter(|count| *count <= Self::MAX)
            .map(Self)
            .ok_or(PollDomainError::VoteCountOutOfRange(value))
    }

    /// Returns the count plus one, or `None` at the persisted maximum.
    #[must_use]
    pub fn incremented(self) -> Option<Self> {
        self.0
            .checked_add(1)
            .filter(|count| *count <= Self::MAX)
            .map(Self)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VoteCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
