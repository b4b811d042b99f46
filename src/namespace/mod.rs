//! # Namespace Gate
//!
//! Decides whether a namespace may hold secrets. The answer comes from a
//! [`NamespaceAuthority`]: the Kubernetes API in a cluster, or a fixed list when
//! running standalone.
//!
//! A namespace is eligible when it exists and carries the eligibility label
//! (`openfaas=true` unless configured otherwise). The default namespace is always
//! eligible and never looked up.

mod kube_authority;
mod static_authority;

pub use kube_authority::KubeNamespaceAuthority;
pub use static_authority::StaticNamespaceAuthority;

use crate::config::StoreConfig;
use crate::secrets::validation::is_valid_namespace_name;
use crate::secrets::SecretStoreError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// What the authority knows about an existing namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceInfo {
    pub labels: BTreeMap<String, String>,
}

/// External service answering namespace existence and metadata questions
#[async_trait]
pub trait NamespaceAuthority: Send + Sync {
    /// `Ok(None)` when the namespace does not exist
    async fn lookup(&self, namespace: &str) -> anyhow::Result<Option<NamespaceInfo>>;
}

/// Eligibility check shared by every store operation
#[derive(Clone)]
pub struct NamespaceGate {
    authority: Arc<dyn NamespaceAuthority>,
    default_namespace: String,
    label_key: String,
    label_value: String,
}

impl std::fmt::Debug for NamespaceGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceGate")
            .field("default_namespace", &self.default_namespace)
            .field("label_key", &self.label_key)
            .field("label_value", &self.label_value)
            .finish_non_exhaustive()
    }
}

impl NamespaceGate {
    pub fn new(authority: Arc<dyn NamespaceAuthority>, config: &StoreConfig) -> Self {
        Self {
            authority,
            default_namespace: config.default_namespace.clone(),
            label_key: config.namespace_label_key.clone(),
            label_value: config.namespace_label_value.clone(),
        }
    }

    /// Whether `namespace` may hold secrets
    ///
    /// Authority failures are returned as errors, never folded into `true` or `false`.
    pub async fn check(&self, namespace: &str) -> Result<bool, SecretStoreError> {
        if namespace == self.default_namespace {
            return Ok(true);
        }

        if !is_valid_namespace_name(namespace) {
            debug!(namespace, "rejecting malformed namespace name");
            return Ok(false);
        }

        match self.authority.lookup(namespace).await {
            Ok(Some(info)) => Ok(info
                .labels
                .get(&self.label_key)
                .is_some_and(|v| *v == self.label_value)),
            Ok(None) => Ok(false),
            Err(e) => {
                warn!(namespace, error = %e, "namespace lookup failed");
                Err(SecretStoreError::NamespaceLookup {
                    namespace: namespace.to_string(),
                    message: format!("{e:#}"),
                })
            }
        }
    }

    /// Like [`check`](Self::check), but an ineligible namespace is an error
    pub async fn require(&self, namespace: &str) -> Result<(), SecretStoreError> {
        if self.check(namespace).await? {
            Ok(())
        } else {
            Err(SecretStoreError::InvalidNamespace(namespace.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingAuthority;

    #[async_trait]
    impl NamespaceAuthority for FailingAuthority {
        async fn lookup(&self, _namespace: &str) -> anyhow::Result<Option<NamespaceInfo>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    fn gate_with(authority: Arc<dyn NamespaceAuthority>) -> NamespaceGate {
        NamespaceGate::new(authority, &StoreConfig::default())
    }

    #[tokio::test]
    async fn test_labelled_namespace_is_valid() {
        let authority = StaticNamespaceAuthority::eligible(["team-a"], "openfaas", "true");
        let gate = gate_with(Arc::new(authority));
        assert!(gate.check("team-a").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_or_unlabelled_namespace_is_invalid() {
        let authority = StaticNamespaceAuthority::default()
            .with_namespace("plain", NamespaceInfo::default())
            .with_namespace(
                "wrong-value",
                NamespaceInfo {
                    labels: [("openfaas".to_string(), "false".to_string())].into(),
                },
            );
        let gate = gate_with(Arc::new(authority));
        assert!(!gate.check("plain").await.unwrap());
        assert!(!gate.check("wrong-value").await.unwrap());
        assert!(!gate.check("absent").await.unwrap());
        assert!(matches!(
            gate.require("absent").await,
            Err(SecretStoreError::InvalidNamespace(ns)) if ns == "absent"
        ));
    }

    #[tokio::test]
    async fn test_default_namespace_skips_lookup() {
        let authority = Arc::new(StaticNamespaceAuthority::default());
        let gate = gate_with(Arc::clone(&authority) as Arc<dyn NamespaceAuthority>);
        assert!(gate.check("openfaas-fn").await.unwrap());
        assert_eq!(authority.lookups(), 0);
    }

    #[tokio::test]
    async fn test_malformed_namespace_skips_lookup() {
        let authority = Arc::new(StaticNamespaceAuthority::default());
        let gate = gate_with(Arc::clone(&authority) as Arc<dyn NamespaceAuthority>);
        assert!(!gate.check("../etc").await.unwrap());
        assert_eq!(authority.lookups(), 0);
    }

    #[tokio::test]
    async fn test_authority_failure_surfaces() {
        let gate = gate_with(Arc::new(FailingAuthority));
        let err = gate.check("team-a").await.unwrap_err();
        assert!(matches!(err, SecretStoreError::NamespaceLookup { .. }));
        assert!(err.to_string().contains("connection refused"));
    }
}
