//! # Request Metrics
//!
//! Metrics for secrets API operations: requests, errors by reason, and latency.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::{HistogramVec, IntCounterVec};
use std::sync::LazyLock;

static REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_store_requests_total",
            "Total number of secrets API requests by operation",
        ),
        &["operation"],
    )
    .expect("Failed to create REQUESTS_TOTAL metric - this should never happen")
});

static REQUEST_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_store_request_errors_total",
            "Total number of failed secrets API requests by operation and reason",
        ),
        &["operation", "reason"],
    )
    .expect("Failed to create REQUEST_ERRORS_TOTAL metric - this should never happen")
});

static REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "secret_store_request_duration_seconds",
            "Duration of secrets API requests in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["operation"],
    )
    .expect("Failed to create REQUEST_DURATION metric - this should never happen")
});

/// Register request metrics with the registry
pub(crate) fn register_request_metrics() -> Result<()> {
    REGISTRY.register(Box::new(REQUESTS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(REQUEST_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(REQUEST_DURATION.clone()))?;
    Ok(())
}

pub fn increment_requests(operation: &str) {
    REQUESTS_TOTAL.with_label_values(&[operation]).inc();
}

pub fn increment_request_errors(operation: &str, reason: &str) {
    REQUEST_ERRORS_TOTAL
        .with_label_values(&[operation, reason])
        .inc();
}

pub fn observe_request_duration(operation: &str, duration_secs: f64) {
    REQUEST_DURATION
        .with_label_values(&[operation])
        .observe(duration_secs);
}
