//! Pollsite: a small opinion-poll web application.
//!
//! Visitors browse published questions, vote for one of a question's
//! choices and view the tallies. Staff manage questions and choices through
//! the admin pages under `/admin/polls/`, which call
//! [`poll::services::PollAdminService`].
//!
//! # Architecture
//!
//! The poll module follows hexagonal architecture principles:
//!
//! - **Domain**: questions, choices and the publication-window rule
//! - **Ports**: the [`poll::ports::PollRepository`] trait
//! - **Adapters**: in-memory and `PostgreSQL` repositories
//! - **Services**: the public catalogue and the admin operations
//!
//! # Modules
//!
//! - [`poll`]: the poll domain and its persistence
//! - [`web`]: HTTP routes and HTML templates
//! - [`config`]: environment-driven settings
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod logging;
pub mod poll;
pub mod web;
