//! Application services for polls.

mod admin;
mod catalogue;
mod error;

pub use admin::{
    CreateQuestionRequest, CreatedQuestion, PollAdminService, QuestionSummary,
    UpdateChoiceRequest, UpdateQuestionRequest,
};
pub use catalogue::{DEFAULT_INDEX_LIMIT, PollCatalogueService, QuestionDetail, VoteOutcome};
pub use error::{PollServiceError, PollServiceResult};
