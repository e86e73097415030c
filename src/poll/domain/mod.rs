//! Domain model for polls.
//!
//! Questions and choices are plain records. The only behavioural rule is the
//! publication window on [`Question`]; persistence and presentation stay
//! outside the domain boundary.

mod choice;
mod error;
mod ids;
mod question;

pub use choice::{Choice, PersistedChoiceData};
pub use error::PollDomainError;
pub use ids::{ChoiceId, PollText, QuestionId, VoteCount};
pub use question::{PUBLICATION_WINDOW, PersistedQuestionData, Question, within_publication_window};
