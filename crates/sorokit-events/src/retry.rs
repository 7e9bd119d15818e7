//! Geometric backoff schedule for event fetches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the fetch retry policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per fetch cycle, including the first.
    pub max_attempts: u32,
    /// Delay after the first failed attempt (milliseconds).
    pub initial_backoff_ms: u64,
    /// Factor applied to the delay after each further failure.
    pub multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 1_000,
            multiplier: 3,
        }
    }
}

/// Stateless retry policy: computes the delay after a given failed attempt.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    pub config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Delay to sleep after failed attempt `attempt` (1-based):
    /// `initial × multiplier^(attempt − 1)`.
    ///
    /// The last attempt is also followed by its delay before the failure is
    /// surfaced, so a cycle of `max_attempts` failures takes the sum of all
    /// delays (1 s + 3 s + 9 s with the defaults).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = u64::from(self.config.multiplier).saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.config.initial_backoff_ms.saturating_mul(factor))
    }

    /// Returns `true` if another attempt follows failed attempt `attempt`.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.config.max_attempts
    }

    /// Worst-case time from the first attempt until a failure is surfaced.
    pub fn total_backoff(&self) -> Duration {
        (1..=self.config.max_attempts.max(1))
            .map(|attempt| self.delay_after(attempt))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1).as_millis(), 1_000);
        assert_eq!(policy.delay_after(2).as_millis(), 3_000);
        assert_eq!(policy.delay_after(3).as_millis(), 9_000);
        assert_eq!(policy.total_backoff(), Duration::from_secs(13));
    }

    #[test]
    fn should_retry_boundary() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn custom_schedule_saturates() {
        let policy = RetryPolicy::new(RetryConfig {
            max_attempts: 2,
            initial_backoff_ms: 250,
            multiplier: 2,
        });
        assert_eq!(policy.delay_after(2).as_millis(), 500);
        assert_eq!(policy.total_backoff().as_millis(), 750);
        assert_eq!(policy.delay_after(200), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: RetryConfig = serde_json::from_str(r#"{ "max_attempts": 5 }"#).unwrap();
        assert_eq!(cfg.max_attempts, 5);
        assert_eq!(cfg.initial_backoff_ms, 1_000);
        assert_eq!(cfg.multiplier, 3);
    }
}
