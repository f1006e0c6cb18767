//! Retry utilities for resilient operations
//!
//! Bounded retries with a randomized backoff drawn uniformly from a
//! `[min_sleep, max_sleep)` window. The budget counts every attempt,
//! including the first one.

use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::RetrySettings;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first
    pub max_attempts: u32,

    /// Minimum backoff sleep (inclusive)
    pub min_sleep: Duration,

    /// Maximum backoff sleep (exclusive)
    pub max_sleep: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            min_sleep: Duration::from_millis(settings.min_sleep_ms),
            max_sleep: Duration::from_millis(settings.max_sleep_ms),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with a custom budget and backoff window
    pub fn new(max_attempts: u32, min_sleep: Duration, max_sleep: Duration) -> Self {
        Self {
            max_attempts,
            min_sleep,
            max_sleep,
        }
    }

    /// Draw a backoff delay uniformly from `[min_sleep, max_sleep)`
    pub fn backoff_delay(&self) -> Duration {
        let min = self.min_sleep.as_millis() as u64;
        let max = self.max_sleep.as_millis() as u64;

        if max <= min {
            return self.min_sleep;
        }

        Duration::from_millis(rand::thread_rng().gen_range(min..max))
    }
}

/// Execute an operation with bounded retries and randomized backoff
///
/// Errors for which `should_retry` returns false are returned immediately.
/// When the budget runs out the last error is returned; callers can tell
/// the two apart by applying the same predicate to the error.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use ytcomments::utils::retry::{with_retry_if, RetryPolicy};
///
/// #[tokio::main]
/// async fn main() {
///     let policy = RetryPolicy::new(3, Duration::from_millis(10), Duration::from_millis(50));
///     let result: Result<u32, String> = with_retry_if(
///         &policy,
///         || async { Ok(42) },
///         |_e: &String| true,
///     )
///     .await;
///     assert_eq!(result, Ok(42));
/// }
/// ```
pub async fn with_retry_if<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) => {
                if !should_retry(&e) {
                    warn!(error = %e, "Non-retryable error encountered");
                    return Err(e);
                }

                if attempt >= max_attempts {
                    warn!(attempt, max_attempts, error = %e, "Retry budget exhausted");
                    return Err(e);
                }

                let delay = policy.backoff_delay();
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Operation failed, sleeping before retry"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
