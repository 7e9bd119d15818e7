//! # sorokit-observability
//!
//! Structured logging for SoroKit. Every crate in the workspace logs through
//! `tracing`; this crate installs the subscriber.
//!
//! - per-component levels (`sorokit-events = "debug"`)
//! - human-readable or JSON output (ELK, Loki, CloudWatch)

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
