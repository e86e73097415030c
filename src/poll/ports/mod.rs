//! Port contracts for polls.
//!
//! Ports define infrastructure-agnostic interfaces used by poll services.

pub mod repository;

pub use repository::{
    CascadeDeletion, PollRepository, PollRepositoryError, PollRepositoryResult,
};
