//! # Initialization
//!
//! Service initialization: tracing, rustls setup, configuration, metrics,
//! root mount path creation, namespace authority and store construction.

use crate::config::{self, AuthorityKind, ServerConfig, StoreConfig};
use crate::constants::SECRET_DIR_MODE;
use crate::namespace::{
    KubeNamespaceAuthority, NamespaceAuthority, NamespaceGate, StaticNamespaceAuthority,
};
use crate::observability;
use crate::secrets::SecretStore;
use crate::server::AppState;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Initialization result containing all necessary components for the service
#[derive(Debug)]
pub struct InitializationResult {
    /// Store configuration, fixed for the life of the process
    pub store_config: StoreConfig,
    /// HTTP server configuration
    pub server_config: ServerConfig,
    /// Handler state wrapping the secret store
    pub state: AppState,
}

/// Initialize the service runtime
///
/// This function handles:
/// - Tracing subscriber setup
/// - rustls crypto provider setup
/// - Configuration loading
/// - Metrics registration
/// - Best-effort creation of the root mount path
/// - Namespace authority and secret store setup
pub async fn initialize() -> Result<InitializationResult> {
    init_tracing();

    // Required for rustls 0.23+ when no default provider is set via features.
    // We use ring as the crypto provider
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }

    info!("Starting namespace secret store v{}", env!("CARGO_PKG_VERSION"));

    let (store_config, server_config) = config::load_config();
    info!(
        mount_path = %store_config.mount_path.display(),
        default_namespace = %store_config.default_namespace,
        authority = ?store_config.authority,
        "Loaded configuration"
    );

    observability::metrics::register_metrics().context("Failed to register metrics")?;

    ensure_mount_path(&store_config.mount_path).await;

    let authority = build_authority(&store_config).await?;
    let gate = NamespaceGate::new(authority, &store_config);
    let store = SecretStore::new(&store_config, gate);

    Ok(InitializationResult {
        store_config,
        server_config,
        state: AppState::new(store),
    })
}

fn init_tracing() {
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "secret_store=info,tower_http=info".into()),
        )
        .try_init()
    {
        warn!("Tracing subscriber init returned error (may already be initialized): {}", e);
    }
}

/// Create the root mount path if missing
///
/// Failure is logged, not fatal: the first operation against a missing root
/// reports the I/O error to its caller.
pub async fn ensure_mount_path(mount_path: &Path) {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(SECRET_DIR_MODE);

    match builder.create(mount_path).await {
        Ok(()) => info!(mount_path = %mount_path.display(), "Secret mount path ready"),
        Err(e) => error!(
            mount_path = %mount_path.display(),
            error = %e,
            "Failed to create secret mount path, continuing"
        ),
    }
}

/// Namespace authority selected by configuration
pub async fn build_authority(config: &StoreConfig) -> Result<Arc<dyn NamespaceAuthority>> {
    match config.authority {
        AuthorityKind::Kubernetes => {
            let authority = KubeNamespaceAuthority::try_default().await?;
            info!("Using Kubernetes namespace authority");
            Ok(Arc::new(authority))
        }
        AuthorityKind::Static => {
            info!(
                namespaces = ?config.static_namespaces,
                "Using static namespace authority"
            );
            Ok(Arc::new(StaticNamespaceAuthority::eligible(
                config.static_namespaces.iter().cloned(),
                &config.namespace_label_key,
                &config.namespace_label_value,
            )))
        }
    }
}
