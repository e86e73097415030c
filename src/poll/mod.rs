//! Polls: questions, choices and voting.
//!
//! A question carries a prompt and a publication timestamp; choices belong to
//! exactly one question and count votes. Questions whose publication time is
//! still in the future stay hidden from the public listing and detail pages.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
