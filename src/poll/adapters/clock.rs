//! Clock adapter pinned to a single instant.

use chrono::{DateTime, Local, Utc};
use mockable::Clock;

/// [`Clock`] that always reports the same instant.
///
/// Used wherever publication-window checks must be reproducible, such as
/// tests that place questions at fixed offsets from "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Creates a clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Creates a clock frozen at the current wall-clock instant.
    #[must_use]
    pub fn frozen_now() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
    }
}
