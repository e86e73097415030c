//! Shared fixtures for in-memory poll integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use pollsite::poll::{
    adapters::{clock::FixedClock, memory::InMemoryPollRepository},
    services::{PollAdminService, PollCatalogueService},
};
use rstest::fixture;

/// Catalogue service wired to the in-memory repository.
pub type TestCatalogue = PollCatalogueService<InMemoryPollRepository, FixedClock>;

/// Admin service wired to the same repository.
pub type TestAdmin = PollAdminService<InMemoryPollRepository, FixedClock>;

/// Both services sharing one repository and a frozen clock.
pub struct PollServices {
    pub now: DateTime<Utc>,
    pub repository: Arc<InMemoryPollRepository>,
    pub catalogue: Arc<TestCatalogue>,
    pub admin: TestAdmin,
}

#[fixture]
pub fn services() -> PollServices {
    let now = Utc
        .with_ymd_and_hms(2026, 10, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let repository = Arc::new(InMemoryPollRepository::new());
    let clock = Arc::new(FixedClock::new(now));
    PollServices {
        now,
        catalogue: Arc::new(PollCatalogueService::new(
            Arc::clone(&repository),
            Arc::clone(&clock),
        )),
        admin: PollAdminService::new(Arc::clone(&repository), clock),
        repository,
    }
}
