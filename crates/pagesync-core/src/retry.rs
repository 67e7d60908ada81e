//! Bounded exponential-backoff retry
//!
//! Wraps a single asynchronous operation with attempt-count-bounded retry.
//! No jitter, no circuit breaking; errors classified as non-retryable
//! bypass the loop entirely.

use std::future::Future;
use std::time::Duration;

/// Errors that can declare whether a retry could plausibly succeed
pub trait Retryable {
    /// Check if a retry could plausibly succeed
    fn is_retryable(&self) -> bool;
}

/// Retry policy: attempt bound and backoff base
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the initial attempt; total attempts = `max_retries + 1`
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Create default policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With retry bound
    #[inline]
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// With backoff base delay
    #[inline]
    #[must_use]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Backoff delay before the retry following failed attempt `attempt`
    /// (zero-based): `base_delay * 2^attempt`, saturating.
    #[inline]
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

/// Retry `op` with exponential backoff until it succeeds, fails terminally,
/// or the attempt bound is reached.
///
/// `on_retry` fires before each backoff suspension with the upcoming attempt
/// number (1-based) and the delay about to be slept; it is a side effect
/// only. Intermediate errors are discarded; only the final attempt's error
/// propagates, unchanged.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    mut on_retry: impl FnMut(u32, Duration),
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_retryable() || attempt == policy.max_retries {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                on_retry(attempt + 1, delay);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_per_attempt() {
        let policy = RetryPolicy::new().with_base_delay(Duration::from_millis(250));
        assert_eq!(policy.delay_for(0), Duration::from_millis(250));
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
    }

    #[test]
    fn delay_saturates_instead_of_overflowing() {
        let policy = RetryPolicy::new().with_base_delay(Duration::from_secs(u64::MAX / 2));
        assert_eq!(policy.delay_for(40), Duration::MAX);
    }
}
