//! HTTP presentation layer.
//!
//! Exposes the public poll pages (index, detail, results, vote) and the
//! administrative question list and forms over `axum`, rendering HTML through
//! [`templates::PageRenderer`].

pub mod admin;
mod error;
pub mod forms;
pub mod handlers;
pub mod templates;
pub mod views;

pub use error::WebError;

use crate::poll::{
    ports::PollRepository,
    services::{PollAdminService, PollCatalogueService},
};
use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use mockable::Clock;
use std::io;
use std::sync::Arc;
use templates::PageRenderer;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

/// Shared state handed to every handler.
pub struct AppState<R, C>
where
    R: PollRepository,
    C: Clock + Send + Sync,
{
    /// Public read and vote operations.
    pub catalogue: Arc<PollCatalogueService<R, C>>,
    /// Administrative operations.
    pub admin: Arc<PollAdminService<R, C>>,
    /// Page renderer.
    pub pages: Arc<PageRenderer>,
}

impl<R, C> AppState<R, C>
where
    R: PollRepository,
    C: Clock + Send + Sync,
{
    /// Builds the state from a repository and clock shared by both services.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>, pages: PageRenderer, index_limit: usize) -> Self {
        let catalogue = PollCatalogueService::new(Arc::clone(&repository), Arc::clone(&clock))
            .with_index_limit(index_limit);
        let admin = PollAdminService::new(repository, clock);
        Self {
            catalogue: Arc::new(catalogue),
            admin: Arc::new(admin),
            pages: Arc::new(pages),
        }
    }
}

impl<R, C> Clone for AppState<R, C>
where
    R: PollRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            catalogue: Arc::clone(&self.catalogue),
            admin: Arc::clone(&self.admin),
            pages: Arc::clone(&self.pages),
        }
    }
}

/// Builds the site router.
pub fn router<R, C>(state: AppState<R, C>) -> Router
where
    R: PollRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(|| async { Redirect::permanent("/polls/") }))
        .route("/polls/", get(handlers::index::<R, C>))
        .route("/polls/{id}/", get(handlers::detail::<R, C>))
        .route("/polls/{id}/results/", get(handlers::results::<R, C>))
        .route("/polls/{id}/vote/", post(handlers::vote::<R, C>))
        .route(
            "/admin/polls/question/",
            get(handlers::admin_question_list::<R, C>),
        )
        .route(
            "/admin/polls/question/add/",
            get(admin::question_add_form::<R, C>).post(admin::question_add::<R, C>),
        )
        .route(
            "/admin/polls/question/{id}/change/",
            get(admin::question_change_form::<R, C>).post(admin::question_change::<R, C>),
        )
        .route(
            "/admin/polls/question/{id}/delete/",
            post(admin::question_delete::<R, C>),
        )
        .route(
            "/admin/polls/question/{id}/choices/",
            post(admin::choice_add::<R, C>),
        )
        .route(
            "/admin/polls/choice/{id}/change/",
            post(admin::choice_change::<R, C>),
        )
        .route(
            "/admin/polls/choice/{id}/delete/",
            post(admin::choice_delete::<R, C>),
        )
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Serves `app` on `listener` until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns the underlying I/O error when the server fails.
pub async fn serve(listener: TcpListener, app: Router) -> io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        info!(%address, "server listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
