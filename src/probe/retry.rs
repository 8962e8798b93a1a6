//! Exponential backoff with jitter for transient probe failures.

use rand::Rng;
use std::time::Duration;

/// Exponent cap so a large retry budget cannot overflow the delay.
const MAX_BACKOFF_EXPONENT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub max_retries: u32,
}

impl BackoffPolicy {
    /// Undithered delay before retry number `retry` (0-based): `base * 2^retry`.
    pub fn base_delay(&self, retry: u32) -> Duration {
        self.base * 2u32.pow(retry.min(MAX_BACKOFF_EXPONENT))
    }

    /// `base_delay` plus uniform jitter in `[0, base)`.
    pub fn delay(&self, retry: u32) -> Duration {
        let base_ms = self.base.as_millis() as u64;
        let jitter = if base_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::rng().random_range(0..base_ms))
        };
        self.base_delay(retry) + jitter
    }

    /// Whether a failed attempt number `attempt` (1-based) may be retried.
    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt <= self.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles() {
        let policy = BackoffPolicy {
            base: Duration::from_millis(500),
            max_retries: 2,
        };
        assert_eq!(policy.base_delay(0), Duration::from_millis(500));
        assert_eq!(policy.base_delay(1), Duration::from_secs(1));
        assert_eq!(policy.base_delay(2), Duration::from_secs(2));
    }

    #[test]
    fn test_jitter_is_bounded() {
        let policy = BackoffPolicy {
            base: Duration::from_millis(100),
            max_retries: 2,
        };
        for _ in 0..50 {
            let delay = policy.delay(1);
            assert!(delay >= Duration::from_millis(200));
            assert!(delay < Duration::from_millis(300));
        }
    }

    #[test]
    fn test_retry_budget() {
        let policy = BackoffPolicy {
            base: Duration::from_millis(10),
            max_retries: 2,
        };
        assert!(policy.allows_retry(1));
        assert!(policy.allows_retry(2));
        assert!(!policy.allows_retry(3));
    }

    #[test]
    fn test_zero_base_has_no_jitter() {
        let policy = BackoffPolicy {
            base: Duration::ZERO,
            max_retries: 1,
        };
        assert_eq!(policy.delay(3), Duration::ZERO);
    }
}
