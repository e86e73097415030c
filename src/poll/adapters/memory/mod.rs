//! In-memory adapters for polls.

mod poll;

pub use poll::InMemoryPollRepository;
