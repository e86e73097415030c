//! `PostgreSQL` adapters for poll persistence.

mod models;
mod repository;
mod schema;

pub use repository::{POLL_SCHEMA_SQL, PollPgPool, PostgresPollRepository, apply_schema};
