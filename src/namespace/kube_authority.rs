//! # Kubernetes Namespace Authority
//!
//! Reads `v1/Namespace` objects to answer existence and label questions.

use super::{NamespaceAuthority, NamespaceInfo};
use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Namespace;
use kube::{Api, Client};
use tracing::debug;

/// Namespace authority backed by the Kubernetes API
///
/// Requires `get` on `namespaces` for the service account.
#[derive(Clone)]
pub struct KubeNamespaceAuthority {
    client: Client,
}

impl std::fmt::Debug for KubeNamespaceAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeNamespaceAuthority").finish_non_exhaustive()
    }
}

impl KubeNamespaceAuthority {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client from in-cluster config or the local kubeconfig
    pub async fn try_default() -> Result<Self> {
        let client = Client::try_default()
            .await
            .context("Failed to create Kubernetes client")?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl NamespaceAuthority for KubeNamespaceAuthority {
    async fn lookup(&self, namespace: &str) -> Result<Option<NamespaceInfo>> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let found = namespaces
            .get_opt(namespace)
            .await
            .with_context(|| format!("Failed to get namespace {namespace}"))?;

        debug!(namespace, found = found.is_some(), "namespace lookup");
        Ok(found.map(|ns| NamespaceInfo {
            labels: ns.metadata.labels.unwrap_or_default(),
        }))
    }
}
