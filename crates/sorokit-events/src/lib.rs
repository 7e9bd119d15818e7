//! # sorokit-events
//!
//! Follows a contract's events over an unreliable RPC connection and keeps
//! an in-memory, deduplicated, ordered view of them.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sorokit_core::EventSource;
//! use sorokit_events::{EventStreamPoller, PollerBuilder, TopicFilter};
//!
//! # async fn run(source: Arc<dyn EventSource>) -> Result<(), Box<dyn std::error::Error>> {
//! let config = PollerBuilder::new("CAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABSC4")
//!     .poll_interval_ms(5_000)
//!     .topic(TopicFilter::new().symbol("transfer").any().any())
//!     .build()?;
//!
//! let (poller, mut updates) = EventStreamPoller::subscribe(source, config)?;
//! while let Ok(event) = updates.recv().await {
//!     println!("{} @ {}", event.id, event.ledger_sequence);
//! }
//! poller.stop_polling();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod poller;
pub mod retry;
pub mod state;
pub mod topics;

pub use config::{ConfigError, PollerBuilder, PollerConfig};
pub use poller::EventStreamPoller;
pub use retry::{RetryConfig, RetryPolicy};
pub use state::{PollerPhase, PollerSnapshot, PollerState};
pub use topics::{TopicFilter, TopicSegment};
