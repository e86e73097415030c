//! Request handlers for the public poll pages and the admin list.
//!
//! The admin form handlers live in [`super::admin`].

use super::{
    AppState, WebError,
    templates::{ADMIN_LIST_TEMPLATE, DETAIL_TEMPLATE, INDEX_TEMPLATE, RESULTS_TEMPLATE},
    views::{AdminListPage, IndexPage, QuestionPage},
};
use crate::poll::{
    domain::{ChoiceId, QuestionId},
    ports::PollRepository,
    services::VoteOutcome,
};
use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use mockable::Clock;
use serde::Deserialize;
use uuid::Uuid;

/// Form body of a vote submission.
#[derive(Debug, Deserialize)]
pub struct VoteForm {
    choice: Option<String>,
}

/// Query string of the admin question list.
#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    q: Option<String>,
}

/// Unparseable identifiers are reported as not-found, like unknown ones.
pub(super) fn parse_question_id(raw: &str) -> Result<QuestionId, WebError> {
    Uuid::parse_str(raw)
        .map(QuestionId::from_uuid)
        .map_err(|_| WebError::NotFound)
}

pub(super) fn parse_choice_path_id(raw: &str) -> Result<ChoiceId, WebError> {
    Uuid::parse_str(raw)
        .map(ChoiceId::from_uuid)
        .map_err(|_| WebError::NotFound)
}

fn parse_choice_id(raw: Option<&str>) -> Option<ChoiceId> {
    raw.and_then(|value| Uuid::parse_str(value.trim()).ok())
        .map(ChoiceId::from_uuid)
}

/// `GET /polls/`
pub async fn index<R, C>(State(state): State<AppState<R, C>>) -> Result<Html<String>, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let questions = state.catalogue.latest_questions().await?;
    let body = state
        .pages
        .render(INDEX_TEMPLATE, IndexPage::new(&questions))?;
    Ok(Html(body))
}

/// `GET /polls/{id}/`
pub async fn detail<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let question_id = parse_question_id(&raw_id)?;
    let detail = state.catalogue.question_detail(question_id).await?;
    let body = state
        .pages
        .render(DETAIL_TEMPLATE, QuestionPage::new(&detail))?;
    Ok(Html(body))
}

/// `GET /polls/{id}/results/`
pub async fn results<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let question_id = parse_question_id(&raw_id)?;
    let detail = state.catalogue.question_results(question_id).await?;
    let body = state
        .pages
        .render(RESULTS_TEMPLATE, QuestionPage::new(&detail))?;
    Ok(Html(body))
}

/// `POST /polls/{id}/vote/`
///
/// Redirects to the results page after a successful vote; re-renders the
/// voting form with an error message when no valid choice was submitted.
pub async fn vote<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
    Form(form): Form<VoteForm>,
) -> Result<Response, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let question_id = parse_question_id(&raw_id)?;
    let choice_id = parse_choice_id(form.choice.as_deref());

    match state.catalogue.vote(question_id, choice_id).await? {
        VoteOutcome::Recorded(_) => {
            Ok(Redirect::to(&format!("/polls/{question_id}/results/")).into_response())
        }
        VoteOutcome::NoChoiceSelected(detail) => {
            let page = QuestionPage::new(&detail).with_missing_choice_error();
            let body = state.pages.render(DETAIL_TEMPLATE, page)?;
            Ok(Html(body).into_response())
        }
    }
}

/// `GET /admin/polls/question/`
pub async fn admin_question_list<R, C>(
    State(state): State<AppState<R, C>>,
    Query(query): Query<AdminListQuery>,
) -> Result<Html<String>, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let search = query.q.as_deref();
    let summaries = state.admin.changelist(search).await?;
    let body = state
        .pages
        .render(ADMIN_LIST_TEMPLATE, AdminListPage::new(&summaries, search))?;
    Ok(Html(body))
}

/// Fallback for unknown paths.
pub async fn not_found() -> WebError {
    WebError::NotFound
}
