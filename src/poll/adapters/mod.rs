//! Adapters for the poll module.
//!
//! Concrete implementations of the [`PollRepository`] port plus a
//! deterministic clock:
//!
//! - [`memory::InMemoryPollRepository`]: thread-safe in-memory storage used
//!   by tests and by the server when no database is configured
//! - [`postgres::PostgresPollRepository`]: `PostgreSQL` persistence using
//!   Diesel
//! - [`clock::FixedClock`]: a `mockable::Clock` frozen at one instant
//!
//! [`PollRepository`]: crate::poll::ports::PollRepository

pub mod clock;
pub mod memory;
pub mod postgres;
