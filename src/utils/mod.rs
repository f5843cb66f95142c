//! # Utility Modules
//!
//! Supporting utilities shared by the parsers, comparator and checksum tools.
//!
//! ## Components
//! - **Hex**: payload previews and hex parsing
//! - **Logging**: structured logging configuration
//! - **Metrics**: thread-safe observability counters

pub mod hex;
pub mod logging;
pub mod metrics;

pub use metrics::{global_metrics, Metrics, MetricsSnapshot, Timer};
