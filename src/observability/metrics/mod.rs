//! # Metrics Module
//!
//! Prometheus metrics, organized by responsibility.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup, registration and text encoding
//! - `request_metrics` - Per-operation request counters and latency

pub mod registry;
pub mod request_metrics;

pub use registry::*;
pub use request_metrics::*;
