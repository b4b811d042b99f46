//! # HTTP Server
//!
//! Serves the secrets API alongside health probes and Prometheus metrics.
//!
//! | Route | Purpose |
//! |---|---|
//! | `/system/secrets` | list (GET), create (POST/PUT), delete (DELETE) |
//! | `/healthz` | liveness |
//! | `/readyz` | readiness, true once the listener is bound |
//! | `/metrics` | Prometheus text format |

pub mod dispatch;
pub mod error;
mod probes;

pub use dispatch::SecretOperation;
pub use error::ErrorResponse;

use crate::constants::SECRETS_ROUTE;
use crate::secrets::SecretStore;
use anyhow::{Context, Result};
use axum::routing::{any, get};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Readiness shared between the server task and startup
#[derive(Debug, Default)]
pub struct ServerState {
    pub is_ready: AtomicBool,
}

/// State handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: SecretStore,
    pub server: Arc<ServerState>,
}

impl AppState {
    pub fn new(store: SecretStore) -> Self {
        Self {
            store,
            server: Arc::new(ServerState::default()),
        }
    }
}

/// Router with every route and the request tracing layer
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(SECRETS_ROUTE, any(dispatch::handle_secrets))
        .route("/healthz", get(probes::healthz))
        .route("/readyz", get(probes::readyz))
        .route("/metrics", get(probes::metrics))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves
///
/// Marks the server ready once the listener is bound.
pub async fn start_server<F>(addr: SocketAddr, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {addr}"))?;

    info!(%addr, "HTTP server listening");
    state.server.is_ready.store(true, Ordering::Relaxed);

    let server = Arc::clone(&state.server);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;

    server.is_ready.store(false, Ordering::Relaxed);
    info!("HTTP server stopped");
    Ok(())
}
