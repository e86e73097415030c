//! Shared world state for poll listing BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use pollsite::poll::{
    adapters::{clock::FixedClock, memory::InMemoryPollRepository},
    domain::{Question, QuestionId},
    services::{PollAdminService, PollCatalogueService, PollServiceError, QuestionDetail},
};
use rstest::fixture;

/// Catalogue type used by the BDD world.
pub type TestCatalogue = PollCatalogueService<InMemoryPollRepository, FixedClock>;

/// Admin service type used by the BDD world.
pub type TestAdmin = PollAdminService<InMemoryPollRepository, FixedClock>;

/// Scenario world for poll listing behaviour tests.
pub struct PollWorld {
    pub now: DateTime<Utc>,
    pub catalogue: TestCatalogue,
    pub admin: TestAdmin,
    pub questions_by_text: HashMap<String, QuestionId>,
    pub last_index: Option<Result<Vec<Question>, PollServiceError>>,
    pub last_detail: Option<Result<QuestionDetail, PollServiceError>>,
}

impl PollWorld {
    /// Creates a world whose clock is frozen at a fixed instant.
    #[must_use]
    pub fn new() -> Self {
        let now = Utc
            .with_ymd_and_hms(2026, 10, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let repository = Arc::new(InMemoryPollRepository::new());
        let clock = Arc::new(FixedClock::new(now));
        Self {
            now,
            catalogue: PollCatalogueService::new(Arc::clone(&repository), Arc::clone(&clock)),
            admin: PollAdminService::new(repository, clock),
            questions_by_text: HashMap::new(),
            last_index: None,
            last_detail: None,
        }
    }

    /// Returns the identifier of a question created earlier in the scenario.
    pub fn question_id(&self, text: &str) -> Result<QuestionId, eyre::Report> {
        self.questions_by_text
            .get(text)
            .copied()
            .ok_or_else(|| eyre::eyre!("no question \"{text}\" in scenario world"))
    }
}

impl Default for PollWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PollWorld {
    PollWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
