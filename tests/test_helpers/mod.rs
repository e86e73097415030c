//! Scoped environment overrides for integration tests.

use std::env;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Every variable the poll server reads from its environment.
pub const POLLS_VARS: [&str; 5] = [
    "POLLS_BIND_ADDR",
    "POLLS_DATABASE_URL",
    "POLLS_POOL_SIZE",
    "POLLS_INDEX_LIMIT",
    "POLLS_TEMPLATE_DIR",
];

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Holds the process environment in a known state until dropped.
///
/// Guards serialise on a global lock, so tests that touch the environment
/// never observe each other's values.
pub struct EnvVarGuard {
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Clears every `POLLS_*` variable, then applies `overrides`.
    pub fn polls(overrides: &[(&'static str, &str)]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let saved = POLLS_VARS
            .iter()
            .map(|key| (*key, env::var(key).ok()))
            .collect();

        for key in POLLS_VARS {
            // SAFETY: ENV_LOCK serialises environment mutation in tests.
            unsafe { env::remove_var(key) };
        }
        for (key, value) in overrides {
            // SAFETY: ENV_LOCK serialises environment mutation in tests.
            unsafe { env::set_var(key, value) };
        }

        Self { saved, _lock: lock }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..) {
            // SAFETY: the guard still holds ENV_LOCK.
            unsafe {
                match value {
                    Some(previous) => env::set_var(key, previous),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
