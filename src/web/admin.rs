//! Admin form handlers for adding, changing and deleting questions and
//! choices.
//!
//! Successful submissions answer `303 See Other`. Rejected input re-renders
//! the form with the submitted values and a message.

use super::{
    AppState, WebError,
    forms::{ChoiceForm, QuestionForm},
    handlers::{parse_choice_path_id, parse_question_id},
    templates::QUESTION_FORM_TEMPLATE,
    views::{CHANGELIST_PATH, QuestionFormPage, change_path},
};
use crate::poll::{
    ports::PollRepository,
    services::{CreateQuestionRequest, PollServiceError, UpdateChoiceRequest, UpdateQuestionRequest},
};
use axum::{
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use mockable::Clock;

/// Turns a validation failure into a form message; anything else is a
/// request failure.
fn validation_message(err: PollServiceError) -> Result<String, WebError> {
    match err {
        PollServiceError::Domain(domain) => Ok(domain.to_string()),
        other => Err(other.into()),
    }
}

fn render_form<R, C>(state: &AppState<R, C>, page: QuestionFormPage) -> Result<Response, WebError>
where
    R: PollRepository,
    C: Clock + Send + Sync,
{
    let body = state.pages.render(QUESTION_FORM_TEMPLATE, page)?;
    Ok(Html(body).into_response())
}

/// `GET /admin/polls/question/add/`
pub async fn question_add_form<R, C>(
    State(state): State<AppState<R, C>>,
) -> Result<Response, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    render_form(&state, QuestionFormPage::add())
}

/// `POST /admin/polls/question/add/`
///
/// Blank choice inputs are ignored; a blank publication time means now.
pub async fn question_add<R, C>(
    State(state): State<AppState<R, C>>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let form = QuestionForm::from_fields(fields);
    let error_message = match form.publication_time() {
        Err(err) => err.to_string(),
        Ok(publication_time) => {
            let mut request =
                CreateQuestionRequest::new(form.text.clone()).with_choices(form.filled_choices());
            if let Some(time) = publication_time {
                request = request.published_at(time);
            }
            match state.admin.create_question(request).await {
                Ok(_) => return Ok(Redirect::to(CHANGELIST_PATH).into_response()),
                Err(err) => validation_message(err)?,
            }
        }
    };
    render_form(
        &state,
        QuestionFormPage::add_with_input(&form).with_error(error_message),
    )
}

/// `GET /admin/polls/question/{id}/change/`
///
/// Unlike the public pages, unpublished questions are shown.
pub async fn question_change_form<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let question_id = parse_question_id(&raw_id)?;
    let detail = state.admin.question(question_id).await?;
    render_form(&state, QuestionFormPage::change(&detail))
}

/// `POST /admin/polls/question/{id}/change/`
///
/// A blank publication time keeps the stored one.
pub async fn question_change<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let question_id = parse_question_id(&raw_id)?;
    let form = QuestionForm::from_fields(fields);
    let error_message = match form.publication_time() {
        Err(err) => err.to_string(),
        Ok(publication_time) => {
            let request = UpdateQuestionRequest {
                text: Some(form.text.clone()),
                publication_time,
            };
            match state.admin.update_question(question_id, request).await {
                Ok(_) => return Ok(Redirect::to(CHANGELIST_PATH).into_response()),
                Err(err) => validation_message(err)?,
            }
        }
    };
    let detail = state.admin.question(question_id).await?;
    let page = QuestionFormPage::change(&detail)
        .with_input(&form)
        .with_error(error_message);
    render_form(&state, page)
}

/// `POST /admin/polls/question/{id}/delete/`
pub async fn question_delete<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let question_id = parse_question_id(&raw_id)?;
    state.admin.delete_question(question_id).await?;
    Ok(Redirect::to(CHANGELIST_PATH).into_response())
}

/// `POST /admin/polls/question/{id}/choices/`
pub async fn choice_add<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
    Form(form): Form<ChoiceForm>,
) -> Result<Response, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let question_id = parse_question_id(&raw_id)?;
    let error_message = match state.admin.add_choice(question_id, form.text).await {
        Ok(_) => return Ok(Redirect::to(&change_path(question_id)).into_response()),
        Err(err) => validation_message(err)?,
    };
    let detail = state.admin.question(question_id).await?;
    render_form(
        &state,
        QuestionFormPage::change(&detail).with_error(error_message),
    )
}

/// `POST /admin/polls/choice/{id}/change/`
///
/// Redirects back to the owning question's change form.
pub async fn choice_change<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
    Form(form): Form<ChoiceForm>,
) -> Result<Response, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let choice_id = parse_choice_path_id(&raw_id)?;
    let question_id = state.admin.choice(choice_id).await?.question_id();
    let error_message = match form.vote_count() {
        Err(err) => err.to_string(),
        Ok(vote_count) => {
            let request = UpdateChoiceRequest {
                text: Some(form.text),
                vote_count,
            };
            match state.admin.update_choice(choice_id, request).await {
                Ok(_) => return Ok(Redirect::to(&change_path(question_id)).into_response()),
                Err(err) => validation_message(err)?,
            }
        }
    };
    let detail = state.admin.question(question_id).await?;
    render_form(
        &state,
        QuestionFormPage::change(&detail).with_error(error_message),
    )
}

/// `POST /admin/polls/choice/{id}/delete/`
pub async fn choice_delete<R, C>(
    State(state): State<AppState<R, C>>,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError>
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let choice_id = parse_choice_path_id(&raw_id)?;
    let removed = state.admin.delete_choice(choice_id).await?;
    Ok(Redirect::to(&change_path(removed.question_id())).into_response())
}
