//! Retry policy with exponential backoff.

use std::time::Duration;

/// How often and how long to wait when a check hits a transport failure.
///
/// The first request is not a retry: a policy with `max_retries = 3` makes up
/// to four requests and sleeps `base, 2×base, 4×base` between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Wait before the first retry; doubled for each retry after that.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Total number of requests allowed, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait before the given retry (1-based).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.delay_for_retry(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_retry(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for_retry(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for_retry(4), Duration::from_secs(8));
    }

    #[test]
    fn test_fractional_base_delay() {
        let policy = RetryPolicy::new(2, Duration::from_millis(250));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(500));
    }

    #[test]
    fn test_attempt_count_includes_first_request() {
        assert_eq!(RetryPolicy::default().max_attempts(), 4);
        assert_eq!(RetryPolicy::no_retry().max_attempts(), 1);
        assert_eq!(RetryPolicy::new(u32::MAX, Duration::ZERO).max_attempts(), u32::MAX);
    }

    #[test]
    fn test_huge_retry_numbers_saturate() {
        let policy = RetryPolicy::new(100, Duration::from_secs(1));
        assert_eq!(
            policy.delay_for_retry(64),
            Duration::from_secs(u64::from(u32::MAX))
        );
        assert_eq!(
            RetryPolicy::new(100, Duration::MAX).delay_for_retry(3),
            Duration::MAX
        );
    }
}
