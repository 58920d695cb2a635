//! Bounded retry with exponential backoff for Gmail API calls

use anyhow::Result;
use std::time::Duration;

use crate::error::AuthError;

/// How many times a network call is attempted, and how long to wait between
/// attempts. The delay doubles after every failure and gets 0-100ms of jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    /// Single attempt, no retries
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Run `op` until it succeeds or attempts are exhausted
    ///
    /// Authorization failures are returned immediately.
    pub fn run<T>(&self, what: &str, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let attempts = self.max_attempts.max(1);
        let mut delay = self.initial_delay;
        let mut attempt = 1;

        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.downcast_ref::<AuthError>().is_some() => return Err(e),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    log::warn!(
                        "{} failed (attempt {}/{}): {:#}; retrying",
                        what,
                        attempt,
                        attempts,
                        e
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay + Duration::from_millis(rand_jitter()));
                    }
                    delay *= 2;
                    attempt += 1;
                }
            }
        }
    }
}

/// Generate a random jitter value (0-100ms)
fn rand_jitter() -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let hasher = RandomState::new().build_hasher();
    hasher.finish() % 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn instant(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    #[test]
    fn test_succeeds_after_transient_failures() {
        let calls = Cell::new(0);
        let result = instant(3).run("op", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                anyhow::bail!("transient");
            }
            Ok(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let result: Result<()> = instant(2).run("op", || {
            calls.set(calls.get() + 1);
            anyhow::bail!("still down")
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_auth_errors_not_retried() {
        let calls = Cell::new(0);
        let result: Result<()> = instant(5).run("op", || {
            calls.set(calls.get() + 1);
            Err(AuthError::new("revoked").into())
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_none_is_single_attempt() {
        assert_eq!(RetryPolicy::none().max_attempts, 1);
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
