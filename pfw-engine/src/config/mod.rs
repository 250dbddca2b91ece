// /////////////////////////////////////////////////////////////////////////////
// Parallel Filtered Chunk Write Engine
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Worker-count resolution: API argument → `H5_NTHREADS` environment
//! variable → compile-time default (§9's open question #2).
//!
//! `H5_NTHREADS` is parsed once per call. Parsing is strict: ASCII digits
//! only, no leading/trailing whitespace, no sign. An invalid value is not
//! fatal — it is logged at `warn` and the default takes over, since an
//! unparsable environment variable should degrade gracefully rather than
//! abort a call that never mentioned threading explicitly.

use std::env;

use pfw_domain::value_objects::WorkerCount;

/// Environment variable carrying a default worker count.
pub const NTHREADS_ENV: &str = "H5_NTHREADS";

/// Worker count used when neither an explicit argument nor
/// `H5_NTHREADS` resolves to a valid value.
pub const DEFAULT_WORKERS: usize = 1;

/// Resolves the worker count for a call.
///
/// `requested`, if `Some`, is the caller's explicit argument and wins
/// outright (still clamped to `[1, Tmax]`). `None` falls through to
/// `H5_NTHREADS`, then to [`DEFAULT_WORKERS`].
pub fn resolve_worker_count(requested: Option<usize>) -> WorkerCount {
    if let Some(count) = requested {
        return WorkerCount::clamped(count);
    }
    match env_nthreads() {
        Some(count) => WorkerCount::clamped(count),
        None => WorkerCount::clamped(DEFAULT_WORKERS),
    }
}

/// Parses `H5_NTHREADS`, returning `None` (and logging a warning) if it is
/// unset or not a plain non-negative decimal integer.
fn env_nthreads() -> Option<usize> {
    let raw = env::var(NTHREADS_ENV).ok()?;
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        tracing::warn!(value = %raw, "H5_NTHREADS is not a plain non-negative integer, ignoring");
        return None;
    }
    match raw.parse::<usize>() {
        Ok(count) => Some(count),
        Err(_) => {
            tracing::warn!(value = %raw, "H5_NTHREADS overflowed usize, ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // H5_NTHREADS is process-global state; serialise the tests that touch it.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<R>(value: Option<&str>, f: impl FnOnce() -> R) -> R {
        let _guard = ENV_LOCK.lock().unwrap();
        let previous = env::var_os(NTHREADS_ENV);
        // SAFETY: serialized by ENV_LOCK.
        unsafe {
            match value {
                Some(v) => env::set_var(NTHREADS_ENV, v),
                None => env::remove_var(NTHREADS_ENV),
            }
        }
        let result = f();
        unsafe {
            match previous {
                Some(v) => env::set_var(NTHREADS_ENV, v),
                None => env::remove_var(NTHREADS_ENV),
            }
        }
        result
    }

    #[test]
    fn explicit_argument_wins_over_environment() {
        with_env(Some("8"), || {
            assert_eq!(resolve_worker_count(Some(4)).count(), 4);
        });
    }

    #[test]
    fn falls_back_to_environment_when_unset_argument() {
        with_env(Some("6"), || {
            assert_eq!(resolve_worker_count(None).count(), 6);
        });
    }

    #[test]
    fn falls_back_to_default_when_env_missing() {
        with_env(None, || {
            assert_eq!(resolve_worker_count(None).count(), DEFAULT_WORKERS);
        });
    }

    #[test]
    fn rejects_whitespace_and_signs_falling_back_to_default() {
        with_env(Some(" 4"), || {
            assert_eq!(resolve_worker_count(None).count(), DEFAULT_WORKERS);
        });
        with_env(Some("-4"), || {
            assert_eq!(resolve_worker_count(None).count(), DEFAULT_WORKERS);
        });
        with_env(Some("4 "), || {
            assert_eq!(resolve_worker_count(None).count(), DEFAULT_WORKERS);
        });
    }

    #[test]
    fn environment_value_above_ceiling_is_clamped_not_rejected() {
        with_env(Some("99999"), || {
            assert_eq!(resolve_worker_count(None).count(), WorkerCount::MAX_WORKERS);
        });
    }
}
