//! Command-line entry point for the poll site.
//!
//! ```text
//! pollsite [-v] serve [--bind 0.0.0.0:8000]
//! pollsite migrate
//! ```
//!
//! Settings come from `POLLS_*` environment variables; see
//! [`pollsite::config`].

use clap::{Parser, Subcommand};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::{Connection, ConnectionError};
use mockable::DefaultClock;
use pollsite::config::{ConfigError, DATABASE_URL_VAR, PollsConfig};
use pollsite::logging;
use pollsite::poll::adapters::memory::InMemoryPollRepository;
use pollsite::poll::adapters::postgres::{PollPgPool, PostgresPollRepository, apply_schema};
use pollsite::poll::ports::{PollRepository, PollRepositoryError};
use pollsite::web::{self, AppState, templates::PageRenderer, templates::TemplateError};
use std::io;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::util::TryInitError;

/// Serve and administer the poll site.
#[derive(Parser)]
#[command(name = "pollsite", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default command)
    Serve {
        /// Listen address, overriding `POLLS_BIND_ADDR`
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Create the poll tables in the configured database
    Migrate,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to install log subscriber: {0}")]
    Logging(#[from] TryInitError),
    #[error(transparent)]
    Templates(#[from] TemplateError),
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
    #[error("failed to connect to database: {0}")]
    Connect(#[from] ConnectionError),
    #[error(transparent)]
    Schema(#[from] PollRepositoryError),
    #[error("{DATABASE_URL_VAR} must be set to run migrations")]
    MissingDatabaseUrl,
    #[error("server I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logging::report_fatal(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    logging::init_logging(cli.verbose)?;
    let mut config = PollsConfig::from_env()?;

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            if let Some(address) = bind {
                config.bind_addr = address;
            }
            serve(config).await
        }
        Command::Migrate => migrate(&config),
    }
}

async fn serve(config: PollsConfig) -> Result<(), CliError> {
    let pages = config
        .template_dir
        .as_deref()
        .map_or_else(PageRenderer::embedded, PageRenderer::with_overrides)?;
    let listener = TcpListener::bind(config.bind_addr).await?;

    let Some(url) = config.database_url.as_deref() else {
        info!("POLLS_DATABASE_URL not set, keeping questions in memory");
        let repository = Arc::new(InMemoryPollRepository::new());
        return serve_with(repository, pages, listener, config.index_limit).await;
    };

    let pool = build_pool(url, config.pool_size)?;
    info!(pool_size = config.pool_size, "using PostgreSQL repository");
    let repository = Arc::new(PostgresPollRepository::new(pool));
    serve_with(repository, pages, listener, config.index_limit).await
}

async fn serve_with<R>(
    repository: Arc<R>,
    pages: PageRenderer,
    listener: TcpListener,
    index_limit: usize,
) -> Result<(), CliError>
where
    R: PollRepository + 'static,
{
    let state = AppState::new(repository, Arc::new(DefaultClock), pages, index_limit);
    web::serve(listener, web::router(state)).await?;
    Ok(())
}

fn build_pool(url: &str, pool_size: u32) -> Result<PollPgPool, PoolError> {
    Pool::builder()
        .max_size(pool_size)
        .build(ConnectionManager::<PgConnection>::new(url))
}

fn migrate(config: &PollsConfig) -> Result<(), CliError> {
    let url = config
        .database_url
        .as_deref()
        .ok_or(CliError::MissingDatabaseUrl)?;
    let mut connection = PgConnection::establish(url)?;
    apply_schema(&mut connection)?;
    info!("poll schema applied");
    Ok(())
}
