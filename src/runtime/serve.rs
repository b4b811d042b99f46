//! # Serve Loop
//!
//! Runs the HTTP server until a shutdown signal arrives.

use super::InitializationResult;
use crate::server::{start_server, ServerState};
use anyhow::{Context, Result};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Serve the secrets API until SIGTERM or Ctrl-C
pub async fn run(init: InitializationResult) -> Result<()> {
    let addr = init.server_config.socket_addr();
    let server_state = std::sync::Arc::clone(&init.state.server);

    let server_handle = tokio::spawn(start_server(addr, init.state, shutdown_signal()));

    wait_for_server_ready(
        &server_state,
        &server_handle,
        Duration::from_secs(init.server_config.startup_timeout_secs),
        Duration::from_millis(init.server_config.poll_interval_ms),
    )
    .await?;
    info!(%addr, "Secret store ready");

    server_handle.await.context("HTTP server task panicked")?
}

/// Wait for the HTTP server to become ready
async fn wait_for_server_ready(
    server_state: &ServerState,
    server_handle: &JoinHandle<Result<()>>,
    startup_timeout: Duration,
    poll_interval: Duration,
) -> Result<()> {
    let start_time = Instant::now();

    loop {
        // Server task exits early only on bind failure
        if server_handle.is_finished() {
            return Err(anyhow::anyhow!("HTTP server failed to start"));
        }

        if server_state.is_ready.load(Ordering::Relaxed) {
            info!("HTTP server is ready and accepting connections");
            return Ok(());
        }

        if start_time.elapsed() > startup_timeout {
            return Err(anyhow::anyhow!(
                "HTTP server failed to become ready within {} seconds",
                startup_timeout.as_secs()
            ));
        }

        tokio::time::sleep(poll_interval).await;
    }
}

/// Resolves on Ctrl-C or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
