//! Tracing subscriber setup for the server binary.

use std::error::Error;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Filter applied when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_FILTER: &str = "pollsite=info";

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Builds the filter for the given verbosity.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` raises the crate's own level
/// from `info` to `debug` (`-v`) or `trace` (`-vv` and above).
#[must_use]
pub fn env_filter(verbose: u8) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directives = match verbose {
        0 => DEFAULT_FILTER,
        1 => "pollsite=debug",
        _ => "pollsite=trace,axum=debug",
    };
    EnvFilter::new(directives)
}

/// Installs the global `fmt` subscriber.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed.
pub fn init_logging(verbose: u8) -> Result<(), TryInitError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(verbose >= 2)
        .with_line_number(verbose >= 3)
        .finish()
        .try_init()?;
    INSTALLED.store(true, Ordering::Release);
    Ok(())
}

/// Logs a fatal error, even when [`init_logging`] did not succeed.
///
/// Without the installed subscriber the event goes to standard error through
/// a scoped one.
pub fn report_fatal(err: &(dyn Error + 'static)) {
    if INSTALLED.load(Ordering::Acquire) {
        error!(error = %err, "pollsite failed");
        return;
    }
    report_fatal_to(err, io::stderr);
}

fn report_fatal_to<W>(err: &(dyn Error + 'static), make_writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::fmt()
        .with_writer(make_writer)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        error!(error = %err, "pollsite failed");
    });
}
