//! # Observability
//!
//! Prometheus metrics for the secrets API. Logging goes through `tracing`; the
//! subscriber is installed in [`crate::runtime::initialization`].

pub mod metrics;
