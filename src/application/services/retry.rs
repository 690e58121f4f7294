//! # Retry Policy
//!
//! Bounded retry with exponential backoff for transient failures.
//!
//! The engine's writes are optimistic read-modify-write cycles: a lost
//! compare-and-swap race surfaces as a retryable error, and the whole
//! cycle (including precondition checks) is re-run against the fresh
//! state. [`RetryPolicy`] bounds how often, [`execute_with_retry`] drives
//! the loop, and jitter keeps concurrent losers from colliding again.

use rand::Rng;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Trait for errors that can indicate whether they are transient.
pub trait Retryable {
    /// Returns true if re-running the operation can succeed.
    fn is_retryable(&self) -> bool;
}

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Delay cap, in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
    /// Jitter factor in `[0, 1]` randomizing each delay downward.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 25,
            max_delay_ms: 1_000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with custom parameters.
    #[must_use]
    pub fn new(
        max_retries: u32,
        initial_delay_ms: u64,
        max_delay_ms: u64,
        backoff_multiplier: f64,
        jitter_factor: f64,
    ) -> Self {
        Self {
            max_retries,
            initial_delay_ms,
            max_delay_ms,
            backoff_multiplier,
            jitter_factor: jitter_factor.clamp(0.0, 1.0),
        }
    }

    /// A policy that makes only the initial attempt.
    #[must_use]
    pub fn fail_fast() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Returns true if another retry is allowed after `attempts_made`
    /// attempts.
    #[must_use]
    pub const fn should_retry(&self, attempts_made: u32) -> bool {
        attempts_made <= self.max_retries
    }

    /// Backoff delay for a 0-indexed retry:
    /// `min(initial * multiplier^attempt, max)`.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let exp = self.backoff_multiplier.powi(i32::try_from(attempt).unwrap_or(i32::MAX));
        let base = self.initial_delay_ms as f64 * exp;
        Duration::from_millis(base.min(self.max_delay_ms as f64) as u64)
    }

    /// Backoff delay with jitter applied as `delay * (1 - jitter * rand)`.
    #[must_use]
    pub fn delay_with_jitter(&self, attempt: u32) -> Duration {
        let base = self.delay(attempt);
        if self.jitter_factor <= 0.0 {
            return base;
        }
        let mut rng = rand::rng();
        let jitter: f64 = rng.random();
        let scaled = base.as_millis() as f64 * (1.0 - self.jitter_factor * jitter);
        Duration::from_millis(scaled.max(1.0) as u64)
    }
}

/// Error returned when retry execution fails.
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every allowed attempt failed with a retryable error.
    MaxRetriesExceeded {
        /// The last error seen.
        last_error: E,
        /// Total attempts made, including the first.
        attempts: u32,
    },
    /// An attempt failed with a non-retryable error; the loop stopped.
    NonRetryable {
        /// The terminal error.
        error: E,
        /// Attempts made before stopping.
        attempts: u32,
    },
}

impl<E> RetryError<E> {
    /// Consumes the wrapper, returning the underlying error.
    #[must_use]
    pub fn into_inner(self) -> E {
        match self {
            Self::MaxRetriesExceeded { last_error, .. } => last_error,
            Self::NonRetryable { error, .. } => error,
        }
    }

    /// Attempts made before giving up.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::MaxRetriesExceeded { attempts, .. } | Self::NonRetryable { attempts, .. } => {
                *attempts
            }
        }
    }

    /// Returns true if the retry budget was exhausted.
    #[must_use]
    pub const fn is_max_retries_exceeded(&self) -> bool {
        matches!(self, Self::MaxRetriesExceeded { .. })
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxRetriesExceeded {
                last_error,
                attempts,
            } => write!(f, "max retries exceeded after {attempts} attempts: {last_error}"),
            Self::NonRetryable { error, attempts } => {
                write!(f, "non-retryable error after {attempts} attempts: {error}")
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}

/// Runs `operation` until it succeeds, returns a non-retryable error, or
/// the policy's retry budget is spent.
///
/// # Errors
///
/// Returns [`RetryError::NonRetryable`] the moment an attempt fails with a
/// non-transient error, or [`RetryError::MaxRetriesExceeded`] once the
/// budget runs out.
pub async fn execute_with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable,
{
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if !error.is_retryable() {
                    return Err(RetryError::NonRetryable { error, attempts });
                }
                if !policy.should_retry(attempts) {
                    return Err(RetryError::MaxRetriesExceeded {
                        last_error: error,
                        attempts,
                    });
                }
                sleep(policy.delay_with_jitter(attempts.saturating_sub(1))).await;
            }
        }
    }
}
