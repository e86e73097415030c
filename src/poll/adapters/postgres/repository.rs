//! `PostgreSQL` repository implementation for poll storage.

use super::{
    models::{ChoiceRow, NewChoiceRow, NewQuestionRow, QuestionRow},
    schema::{choices, questions},
};
use crate::poll::{
    domain::{
        Choice, ChoiceId, PersistedChoiceData, PersistedQuestionData, PollText, Question,
        QuestionId, VoteCount,
    },
    ports::{CascadeDeletion, PollRepository, PollRepositoryError, PollRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::dsl::count_star;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by poll adapters.
pub type PollPgPool = Pool<ConnectionManager<PgConnection>>;

/// Idempotent DDL creating the poll tables.
pub const POLL_SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_polls/up.sql");

/// Creates the poll tables when they do not exist yet.
///
/// # Errors
///
/// Returns [`PollRepositoryError::Persistence`] when the DDL fails.
pub fn apply_schema(connection: &mut PgConnection) -> PollRepositoryResult<()> {
    connection
        .batch_execute(POLL_SCHEMA_SQL)
        .map_err(PollRepositoryError::persistence)
}

/// `PostgreSQL`-backed poll repository.
#[derive(Debug, Clone)]
pub struct PostgresPollRepository {
    pool: PollPgPool,
}

impl PostgresPollRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PollPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> PollRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PollRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(PollRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(PollRepositoryError::persistence)?
    }
}

impl From<DieselError> for PollRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl PollRepository for PostgresPollRepository {
    async fn store_question(&self, question: &Question) -> PollRepositoryResult<()> {
        let question_id = question.id();
        let new_row = to_new_question_row(question);

        self.run_blocking(move |connection| {
            diesel::insert_into(questions::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| question_insert_error(err, question_id))?;
            Ok(())
        })
        .await
    }

    async fn store_question_with_choices(
        &self,
        question: &Question,
        choices: &[Choice],
    ) -> PollRepositoryResult<()> {
        let question_id = question.id();
        if let Some(stray) = choices
            .iter()
            .find(|choice| choice.question_id() != question_id)
        {
            return Err(PollRepositoryError::QuestionNotFound(stray.question_id()));
        }
        let question_row = to_new_question_row(question);
        let choice_rows = choices
            .iter()
            .map(to_new_choice_row)
            .collect::<PollRepositoryResult<Vec<_>>>()?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, PollRepositoryError, _>(|tx| {
                diesel::insert_into(questions::table)
                    .values(&question_row)
                    .execute(tx)
                    .map_err(|err| question_insert_error(err, question_id))?;
                // One insert per row so `position` follows the slice order.
                for row in &choice_rows {
                    diesel::insert_into(choices::table)
                        .values(row)
                        .execute(tx)
                        .map_err(|err| {
                            choice_insert_error(err, question_id, ChoiceId::from_uuid(row.id))
                        })?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn update_question(&self, question: &Question) -> PollRepositoryResult<()> {
        let question_id = question.id();
        let row = to_new_question_row(question);

        self.run_blocking(move |connection| {
            let updated_count =
                diesel::update(questions::table.filter(questions::id.eq(row.id)))
                    .set(&row)
                    .execute(connection)?;
            if updated_count == 0 {
                return Err(PollRepositoryError::QuestionNotFound(question_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_question(&self, id: QuestionId) -> PollRepositoryResult<Option<Question>> {
        self.run_blocking(move |connection| {
            let row = questions::table
                .filter(questions::id.eq(id.into_inner()))
                .select(QuestionRow::as_select())
                .first::<QuestionRow>(connection)
                .optional()?;
            row.map(row_to_question).transpose()
        })
        .await
    }

    async fn list_published(
        &self,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> PollRepositoryResult<Vec<Question>> {
        let limit = limit
            .map(i64::try_from)
            .transpose()
            .map_err(PollRepositoryError::persistence)?;

        self.run_blocking(move |connection| {
            let mut query = questions::table
                .filter(questions::published_at.le(now))
                .order((questions::published_at.desc(), questions::id.asc()))
                .select(QuestionRow::as_select())
                .into_boxed();
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            let rows = query.load::<QuestionRow>(connection)?;
            rows.into_iter().map(row_to_question).collect()
        })
        .await
    }

    async fn list_questions(&self, search: Option<&str>) -> PollRepositoryResult<Vec<Question>> {
        let pattern = search.map(|needle| format!("%{}%", escape_like(needle)));

        self.run_blocking(move |connection| {
            let mut query = questions::table
                .order((questions::published_at.desc(), questions::id.asc()))
                .select(QuestionRow::as_select())
                .into_boxed();
            if let Some(pattern) = pattern {
                query = query.filter(questions::prompt.ilike(pattern));
            }
            let rows = query.load::<QuestionRow>(connection)?;
            rows.into_iter().map(row_to_question).collect()
        })
        .await
    }

    async fn delete_question(&self, id: QuestionId) -> PollRepositoryResult<CascadeDeletion> {
        let question_uuid = id.into_inner();

        self.run_blocking(move |connection| {
            connection.transaction::<_, PollRepositoryError, _>(|tx| {
                let removed = diesel::delete(
                    choices::table.filter(choices::question_id.eq(question_uuid)),
                )
                .returning(choices::id)
                .get_results::<uuid::Uuid>(tx)?;

                let deleted_count =
                    diesel::delete(questions::table.filter(questions::id.eq(question_uuid)))
                        .execute(tx)?;
                if deleted_count == 0 {
                    return Err(PollRepositoryError::QuestionNotFound(id));
                }

                Ok(CascadeDeletion {
                    question_id: id,
                    removed_choices: removed.into_iter().map(ChoiceId::from_uuid).collect(),
                })
            })
        })
        .await
    }

    async fn store_choice(&self, choice: &Choice) -> PollRepositoryResult<()> {
        let choice_id = choice.id();
        let question_id = choice.question_id();
        let new_row = to_new_choice_row(choice)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(choices::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| choice_insert_error(err, question_id, choice_id))?;
            Ok(())
        })
        .await
    }

    async fn update_choice(&self, choice: &Choice) -> PollRepositoryResult<()> {
        let choice_id = choice.id();
        let row = to_new_choice_row(choice)?;

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(
                choices::table
                    .filter(choices::id.eq(row.id))
                    .filter(choices::question_id.eq(row.question_id)),
            )
            .set((
                choices::label.eq(&row.label),
                choices::vote_count.eq(row.vote_count),
            ))
            .execute(connection)?;
            if updated_count == 0 {
                return Err(PollRepositoryError::ChoiceNotFound(choice_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_choice(&self, id: ChoiceId) -> PollRepositoryResult<Option<Choice>> {
        self.run_blocking(move |connection| {
            let row = choices::table
                .filter(choices::id.eq(id.into_inner()))
                .select(ChoiceRow::as_select())
                .first::<ChoiceRow>(connection)
                .optional()?;
            row.map(row_to_choice).transpose()
        })
        .await
    }

    async fn choices_for(&self, question_id: QuestionId) -> PollRepositoryResult<Vec<Choice>> {
        self.run_blocking(move |connection| {
            let rows = choices::table
                .filter(choices::question_id.eq(question_id.into_inner()))
                .order(choices::position.asc())
                .select(ChoiceRow::as_select())
                .load::<ChoiceRow>(connection)?;
            rows.into_iter().map(row_to_choice).collect()
        })
        .await
    }

    async fn count_choices(
        &self,
        question_ids: &[QuestionId],
    ) -> PollRepositoryResult<HashMap<QuestionId, usize>> {
        let question_uuids: Vec<uuid::Uuid> =
            question_ids.iter().map(|id| id.into_inner()).collect();

        self.run_blocking(move |connection| {
            let rows = choices::table
                .filter(choices::question_id.eq_any(question_uuids))
                .group_by(choices::question_id)
                .select((choices::question_id, count_star()))
                .load::<(uuid::Uuid, i64)>(connection)?;
            rows.into_iter()
                .map(|(question_uuid, raw_count)| {
                    let choice_count =
                        usize::try_from(raw_count).map_err(PollRepositoryError::persistence)?;
                    Ok((QuestionId::from_uuid(question_uuid), choice_count))
                })
                .collect()
        })
        .await
    }

    async fn delete_choice(&self, id: ChoiceId) -> PollRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted_count =
                diesel::delete(choices::table.filter(choices::id.eq(id.into_inner())))
                    .execute(connection)?;
            if deleted_count == 0 {
                return Err(PollRepositoryError::ChoiceNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn record_vote(&self, id: ChoiceId) -> PollRepositoryResult<Choice> {
        self.run_blocking(move |connection| {
            // Single-statement increment keeps concurrent votes from being lost.
            let row = diesel::update(choices::table.filter(choices::id.eq(id.into_inner())))
                .set(choices::vote_count.eq(choices::vote_count + 1))
                .returning(ChoiceRow::as_returning())
                .get_result::<ChoiceRow>(connection)
                .optional()
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::Unknown, ref info)
                        if info.message().contains("out of range") =>
                    {
                        PollRepositoryError::VoteCountOverflow(id)
                    }
                    _ => PollRepositoryError::persistence(err),
                })?
                .ok_or(PollRepositoryError::ChoiceNotFound(id))?;
            row_to_choice(row)
        })
        .await
    }
}

fn question_insert_error(err: DieselError, question_id: QuestionId) -> PollRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            PollRepositoryError::DuplicateQuestion(question_id)
        }
        _ => PollRepositoryError::persistence(err),
    }
}

fn choice_insert_error(
    err: DieselError,
    question_id: QuestionId,
    choice_id: ChoiceId,
) -> PollRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            PollRepositoryError::QuestionNotFound(question_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            PollRepositoryError::DuplicateChoice(choice_id)
        }
        _ => PollRepositoryError::persistence(err),
    }
}

fn to_new_question_row(question: &Question) -> NewQuestionRow {
    NewQuestionRow {
        id: question.id().into_inner(),
        prompt: question.text().as_str().to_owned(),
        published_at: question.publication_time(),
    }
}

fn to_new_choice_row(choice: &Choice) -> PollRepositoryResult<NewChoiceRow> {
    let vote_count =
        i32::try_from(choice.vote_count().value()).map_err(PollRepositoryError::persistence)?;
    Ok(NewChoiceRow {
        id: choice.id().into_inner(),
        question_id: choice.question_id().into_inner(),
        label: choice.text().as_str().to_owned(),
        vote_count,
    })
}

fn row_to_question(row: QuestionRow) -> PollRepositoryResult<Question> {
    let QuestionRow {
        id,
        prompt,
        published_at,
    } = row;
    let text = PollText::new(prompt).map_err(PollRepositoryError::persistence)?;

    Ok(Question::from_persisted(PersistedQuestionData {
        id: QuestionId::from_uuid(id),
        text,
        publication_time: published_at,
    }))
}

fn row_to_choice(row: ChoiceRow) -> PollRepositoryResult<Choice> {
    let ChoiceRow {
        id,
        question_id,
        label,
        vote_count: persisted_votes,
    } = row;
    let text = PollText::new(label).map_err(PollRepositoryError::persistence)?;
    let raw_votes = u64::try_from(persisted_votes).map_err(PollRepositoryError::persistence)?;
    let vote_count = VoteCount::new(raw_votes).map_err(PollRepositoryError::persistence)?;

    Ok(Choice::from_persisted(PersistedChoiceData {
        id: ChoiceId::from_uuid(id),
        question_id: QuestionId::from_uuid(question_id),
        text,
        vote_count,
    }))
}

/// Escapes `LIKE` wildcards so user search text matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
