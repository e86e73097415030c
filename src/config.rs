//! Environment-driven configuration for the poll server.
//!
//! | variable | default |
//! |---|---|
//! | `POLLS_BIND_ADDR` | `127.0.0.1:8000` |
//! | `POLLS_DATABASE_URL` | unset: questions are kept in memory |
//! | `POLLS_POOL_SIZE` | `8` |
//! | `POLLS_INDEX_LIMIT` | `5` |
//! | `POLLS_TEMPLATE_DIR` | unset: embedded templates only |

use crate::poll::services::DEFAULT_INDEX_LIMIT;
use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Listen address variable.
pub const BIND_ADDR_VAR: &str = "POLLS_BIND_ADDR";
/// `PostgreSQL` connection URL variable.
pub const DATABASE_URL_VAR: &str = "POLLS_DATABASE_URL";
/// Connection pool size variable.
pub const POOL_SIZE_VAR: &str = "POLLS_POOL_SIZE";
/// Index page size variable.
pub const INDEX_LIMIT_VAR: &str = "POLLS_INDEX_LIMIT";
/// Template override directory variable.
pub const TEMPLATE_DIR_VAR: &str = "POLLS_TEMPLATE_DIR";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_POOL_SIZE: u32 = 8;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be used.
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        /// Offending variable.
        key: &'static str,
        /// Raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollsConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// `PostgreSQL` URL; `None` selects the in-memory repository.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_size: u32,
    /// Number of questions shown on the index page.
    pub index_limit: usize,
    /// Directory whose templates override the embedded ones.
    pub template_dir: Option<String>,
}

impl PollsConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which returns the raw value of
    /// a variable when it is set.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable cannot be parsed or a
    /// count is zero.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr = parse_or(BIND_ADDR_VAR, read(BIND_ADDR_VAR), DEFAULT_BIND_ADDR)?;
        let pool_size = positive(POOL_SIZE_VAR, read(POOL_SIZE_VAR), DEFAULT_POOL_SIZE)?;
        let index_limit = positive(INDEX_LIMIT_VAR, read(INDEX_LIMIT_VAR), DEFAULT_INDEX_LIMIT)?;

        Ok(Self {
            bind_addr,
            database_url: read(DATABASE_URL_VAR),
            pool_size,
            index_limit,
            template_dir: read(TEMPLATE_DIR_VAR),
        })
    }
}

fn parse_value<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
        value,
    })
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let value = raw.unwrap_or_else(|| {
        debug!("{key} not set, using default: {default}");
        default.to_owned()
    });
    parse_value(key, value)
}

fn positive<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
    T::Err: Display,
{
    let Some(value) = raw else {
        return Ok(default);
    };
    let parsed: T = parse_value(key, value.clone())?;
    if parsed == T::default() {
        return Err(ConfigError::Invalid {
            key,
            value,
            reason: "must be greater than zero".to_owned(),
        });
    }
    Ok(parsed)
}
