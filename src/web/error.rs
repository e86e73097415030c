//! Mapping of service failures onto HTTP responses.

use super::templates::TemplateError;
use crate::poll::services::PollServiceError;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

const NOT_FOUND_BODY: &str = "<!DOCTYPE html><html><head><title>Not Found</title></head>\
<body><h1>Not Found</h1><p>The requested resource was not found on this server.</p></body></html>";

const SERVER_ERROR_BODY: &str = "<!DOCTYPE html><html><head><title>Server Error</title></head>\
<body><h1>Server Error (500)</h1></body></html>";

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum WebError {
    /// The requested question or choice does not exist or is not visible.
    #[error("not found")]
    NotFound,

    /// A service call failed for reasons other than a missing record.
    #[error(transparent)]
    Service(PollServiceError),

    /// A page could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl From<PollServiceError> for WebError {
    fn from(err: PollServiceError) -> Self {
        if err.is_not_found() {
            Self::NotFound
        } else {
            Self::Service(err)
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_BODY)).into_response(),
            Self::Service(err) => {
                error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_BODY)).into_response()
            }
            Self::Template(err) => {
                error!(error = %err, "page rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_BODY)).into_response()
            }
        }
    }
}
