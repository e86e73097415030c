//! Shared test helpers for `PostgreSQL` integration tests.

use std::env;
use std::sync::OnceLock;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Error as PoolConnectionError, Pool};
use pollsite::poll::{
    adapters::postgres::{PostgresPollRepository, apply_schema},
    domain::{Choice, PollText, Question},
    ports::PollRepository,
};

/// Boxed error used by fixture setup.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Variable naming the database the tests run against.
pub const TEST_DATABASE_URL_VAR: &str = "POLLS_TEST_DATABASE_URL";

static SCHEMA_READY: OnceLock<Result<(), String>> = OnceLock::new();

/// Opens every pooled connection inside a test transaction.
#[derive(Debug)]
struct TestTransaction;

impl CustomizeConnection<PgConnection, PoolConnectionError> for TestTransaction {
    fn on_acquire(&self, connection: &mut PgConnection) -> Result<(), PoolConnectionError> {
        connection
            .begin_test_transaction()
            .map_err(PoolConnectionError::QueryError)
    }
}

fn test_database_url(value: Option<String>) -> Result<String, BoxError> {
    value
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| format!("{TEST_DATABASE_URL_VAR} must name a scratch database").into())
}

fn ensure_schema(url: &str) -> Result<(), BoxError> {
    SCHEMA_READY
        .get_or_init(|| {
            let mut connection = PgConnection::establish(url).map_err(|err| err.to_string())?;
            apply_schema(&mut connection).map_err(|err| err.to_string())
        })
        .clone()
        .map_err(BoxError::from)
}

/// Builds a repository over a single-connection pool whose connection never
/// commits.
///
/// # Errors
///
/// Returns an error if `POLLS_TEST_DATABASE_URL` is unset, the schema cannot
/// be applied, or the pool cannot connect.
pub fn test_repository() -> Result<PostgresPollRepository, BoxError> {
    let url = test_database_url(env::var(TEST_DATABASE_URL_VAR).ok())?;
    ensure_schema(&url)?;

    let pool = Pool::builder()
        .max_size(1)
        .connection_customizer(Box::new(TestTransaction))
        .build(ConnectionManager::<PgConnection>::new(url))?;
    Ok(PostgresPollRepository::new(pool))
}

/// Current instant truncated to whole microseconds, the `TIMESTAMPTZ`
/// resolution.
#[must_use]
pub fn db_now() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(TimeDelta::microseconds(1)).unwrap_or(now)
}

/// Stores a question published at `publication_time`.
///
/// # Errors
///
/// Returns an error if the text is invalid or the insert fails.
pub async fn insert_question(
    repository: &PostgresPollRepository,
    prompt: &str,
    publication_time: DateTime<Utc>,
) -> Result<Question, BoxError> {
    let question = Question::new(PollText::new(prompt)?, publication_time);
    repository.store_question(&question).await?;
    Ok(question)
}

/// Stores a choice for `question`.
///
/// # Errors
///
/// Returns an error if the text is invalid or the insert fails.
pub async fn insert_choice(
    repository: &PostgresPollRepository,
    question: &Question,
    label: &str,
) -> Result<Choice, BoxError> {
    let choice = Choice::new(question.id(), PollText::new(label)?);
    repository.store_choice(&choice).await?;
    Ok(choice)
}

#[cfg(test)]
mod tests {
    use super::test_database_url;
    use rstest::rstest;

    #[rstest]
    #[case::unset(None)]
    #[case::blank(Some("   ".to_owned()))]
    fn missing_database_url_fails_instead_of_skipping(#[case] value: Option<String>) {
        let err = test_database_url(value).expect_err("no database configured");
        assert!(err.to_string().contains("POLLS_TEST_DATABASE_URL"));
    }

    #[rstest]
    fn configured_database_url_is_used() {
        let url = test_database_url(Some("postgres://localhost/polls_test".to_owned()))
            .expect("url is set");
        assert_eq!(url, "postgres://localhost/polls_test");
    }
}
