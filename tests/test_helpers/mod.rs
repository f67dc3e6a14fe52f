//! Scoped environment overrides for integration tests.

use std::env;
use std::ffi::OsStr;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Restores one environment variable when dropped.
///
/// Holding the guard also holds a process-wide lock, so tests that touch the
/// environment run one at a time.
pub struct EnvVarGuard {
    key: String,
    previous: Option<std::ffi::OsString>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Sets `key` to `value` for the guard lifetime.
    pub fn set(key: &str, value: impl AsRef<OsStr>) -> Self {
        Self::apply(key, Some(value.as_ref()))
    }

    /// Removes `key` for the guard lifetime.
    pub fn unset(key: &str) -> Self {
        Self::apply(key, None)
    }

    fn apply(key: &str, value: Option<&OsStr>) -> Self {
        let lock = env_lock();
        let previous = env::var_os(key);
        unsafe {
            // SAFETY: the global mutex serializes environment mutations in tests.
            match value {
                Some(new_value) => env::set_var(key, new_value),
                None => env::remove_var(key),
            }
        }
        Self {
            key: key.to_owned(),
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        unsafe {
            // SAFETY: the global mutex serializes environment mutations in tests.
            match self.previous.take() {
                Some(previous) => env::set_var(&self.key, previous),
                None => env::remove_var(&self.key),
            }
        }
    }
}

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
