//! Poller configuration and its fluent builder.
//!
//! # Example
//!
//! ```
//! use sorokit_events::{PollerBuilder, TopicFilter};
//!
//! let config = PollerBuilder::new("CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4")
//!     .poll_interval_ms(5_000)
//!     .limit(50)
//!     .topic(TopicFilter::new().symbol("transfer").any().any())
//!     .build()
//!     .unwrap();
//! assert_eq!(config.limit, 50);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::RetryConfig;
use crate::topics::{TopicFilter, MAX_TOPIC_SEGMENTS};

fn default_limit() -> u32 {
    100
}

fn default_poll_interval_ms() -> Option<u64> {
    Some(5_000)
}

fn default_degraded_multiplier() -> u32 {
    2
}

fn default_channel_capacity() -> usize {
    1_024
}

/// Configuration for one event poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Contract whose events are followed.
    pub contract_id: String,
    /// Topic patterns in query form; `None` matches every topic.
    #[serde(default)]
    pub topics: Option<Vec<Vec<String>>>,
    /// Base polling interval (milliseconds). `None` disables scheduled
    /// polling: only the initial fetch and manual refreshes run.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: Option<u64>,
    /// Maximum events requested per query.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Ledger to start from while no cursor is known.
    #[serde(default)]
    pub start_ledger: Option<u64>,
    /// Keep at most this many events; the oldest are dropped first.
    #[serde(default)]
    pub max_events: Option<usize>,
    /// Interval factor applied while degraded.
    #[serde(default = "default_degraded_multiplier")]
    pub degraded_multiplier: u32,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Capacity of the broadcast channel carrying new events.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl PollerConfig {
    pub fn new(contract_id: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            topics: None,
            poll_interval_ms: default_poll_interval_ms(),
            limit: default_limit(),
            start_ledger: None,
            max_events: None,
            degraded_multiplier: default_degraded_multiplier(),
            retry: RetryConfig::default(),
            channel_capacity: default_channel_capacity(),
        }
    }

    /// Delay until the next scheduled poll, or `None` when polling is disabled.
    pub fn next_interval(&self, degraded: bool) -> Option<Duration> {
        let base = self.poll_interval_ms?;
        let ms = if degraded {
            base.saturating_mul(u64::from(self.degraded_multiplier))
        } else {
            base
        };
        Some(Duration::from_millis(ms))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.contract_id.trim().is_empty() {
            return Err(ConfigError::MissingContract);
        }
        if self.limit == 0 {
            return Err(ConfigError::Invalid("limit must be at least 1".into()));
        }
        if self.poll_interval_ms == Some(0) {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }
        if self.degraded_multiplier == 0 {
            return Err(ConfigError::Invalid("degraded_multiplier must be at least 1".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be at least 1".into()));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be at least 1".into()));
        }
        if let Some(pattern) = self
            .topics
            .iter()
            .flatten()
            .find(|p| p.is_empty() || p.len() > MAX_TOPIC_SEGMENTS)
        {
            return Err(ConfigError::TopicLength {
                len: pattern.len(),
                max: MAX_TOPIC_SEGMENTS,
            });
        }
        Ok(())
    }
}

/// Rejected poller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("contract_id is required")]
    MissingContract,

    #[error("topic pattern has {len} segments; expected 1..={max}")]
    TopicLength { len: usize, max: usize },

    #[error("invalid poller config: {0}")]
    Invalid(String),
}

/// Fluent builder for [`PollerConfig`].
#[derive(Debug, Clone)]
pub struct PollerBuilder {
    config: PollerConfig,
}

impl PollerBuilder {
    pub fn new(contract_id: impl Into<String>) -> Self {
        Self {
            config: PollerConfig::new(contract_id),
        }
    }

    /// Set the base polling interval in milliseconds.
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = Some(ms);
        self
    }

    /// Disable scheduled polling.
    pub fn manual_only(mut self) -> Self {
        self.config.poll_interval_ms = None;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.config.limit = limit;
        self
    }

    /// Add a topic pattern. Events matching any added pattern are returned.
    pub fn topic(mut self, filter: TopicFilter) -> Self {
        self.config
            .topics
            .get_or_insert_with(Vec::new)
            .push(filter.segments());
        self
    }

    pub fn start_ledger(mut self, ledger: u64) -> Self {
        self.config.start_ledger = Some(ledger);
        self
    }

    pub fn max_events(mut self, max: usize) -> Self {
        self.config.max_events = Some(max);
        self
    }

    pub fn degraded_multiplier(mut self, factor: u32) -> Self {
        self.config.degraded_multiplier = factor;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// Validate and return the config.
    pub fn build(self) -> Result<PollerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4";

    #[test]
    fn builder_defaults() {
        let cfg = PollerBuilder::new(CONTRACT).build().unwrap();
        assert_eq!(cfg.limit, 100);
        assert_eq!(cfg.poll_interval_ms, Some(5_000));
        assert_eq!(cfg.degraded_multiplier, 2);
        assert_eq!(cfg.retry, RetryConfig::default());
        assert!(cfg.topics.is_none());
    }

    #[test]
    fn degraded_interval_doubles() {
        let cfg = PollerBuilder::new(CONTRACT).poll_interval_ms(1_500).build().unwrap();
        assert_eq!(cfg.next_interval(false), Some(Duration::from_millis(1_500)));
        assert_eq!(cfg.next_interval(true), Some(Duration::from_millis(3_000)));
        let manual = PollerBuilder::new(CONTRACT).manual_only().build().unwrap();
        assert_eq!(manual.next_interval(true), None);
    }

    #[test]
    fn topics_accumulate() {
        let cfg = PollerBuilder::new(CONTRACT)
            .topic(TopicFilter::new().symbol("mint"))
            .topic(TopicFilter::new().symbol("burn").any())
            .build()
            .unwrap();
        let topics = cfg.topics.unwrap();
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[1][1], "*");
    }

    #[test]
    fn rejects_bad_config() {
        assert_eq!(PollerBuilder::new(" ").build(), Err(ConfigError::MissingContract));
        assert!(PollerBuilder::new(CONTRACT).limit(0).build().is_err());
        assert!(PollerBuilder::new(CONTRACT).poll_interval_ms(0).build().is_err());
        let long = TopicFilter::new().any().any().any().any().any();
        assert_eq!(
            PollerBuilder::new(CONTRACT).topic(long).build(),
            Err(ConfigError::TopicLength { len: 5, max: 4 })
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let cfg: PollerConfig = serde_json::from_str(&format!(
            r#"{{ "contract_id": "{CONTRACT}", "poll_interval_ms": null, "retry": {{ "max_attempts": 1 }} }}"#
        ))
        .unwrap();
        assert_eq!(cfg.poll_interval_ms, None);
        assert_eq!(cfg.limit, 100);
        assert_eq!(cfg.retry.max_attempts, 1);
        assert_eq!(cfg.retry.initial_backoff_ms, 1_000);
    }
}
