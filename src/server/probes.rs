//! Liveness, readiness and metrics endpoints.

use super::error::error_response;
use super::AppState;
use crate::observability::metrics::gather_text;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::atomic::Ordering;
use tracing::error;

pub(super) async fn healthz() -> &'static str {
    "ok"
}

pub(super) async fn readyz(State(state): State<AppState>) -> Response {
    if state.server.is_ready.load(Ordering::Relaxed) {
        (StatusCode::OK, "ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready").into_response()
    }
}

pub(super) async fn metrics() -> Response {
    match gather_text() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "metrics_error",
                e.to_string(),
            )
        }
    }
}
