//! # Retry Wrapper
//!
//! A generic retry combinator for fallible async operations.
//!
//! Attempts run strictly one at a time; on failure the combinator sleeps
//! `base_delay * attempt_number` (linear backoff, no jitter, no circuit
//! breaker) before the next attempt, and after the final attempt returns the
//! last error unchanged to the caller.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

// =============================================================================
// POLICY
// =============================================================================

/// Default number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default backoff base in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// Retry policy: attempt count and linear backoff base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Treated as at least 1.
    pub max_attempts: u32,
    /// Backoff base; attempt N failure waits N * base before the next try.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Build a policy from `TIDEMARK_RETRY_ATTEMPTS` / `TIDEMARK_RETRY_BASE_MS`,
    /// falling back to the defaults for unset or unparseable values.
    #[must_use]
    pub fn from_env() -> Self {
        let max_attempts = std::env::var("TIDEMARK_RETRY_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);
        let base_ms = std::env::var("TIDEMARK_RETRY_BASE_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_BASE_DELAY_MS);

        Self {
            max_attempts,
            base_delay: Duration::from_millis(base_ms),
        }
    }

    /// Delay after the given failed attempt (1-based): `base * attempt`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

// =============================================================================
// COMBINATOR
// =============================================================================

/// Run `operation` up to `policy.max_attempts` times, awaiting each attempt
/// before starting the next. Returns the first success, or the last error
/// once attempts are exhausted.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    "attempt {}/{} failed: {} (retrying in {:?})",
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
