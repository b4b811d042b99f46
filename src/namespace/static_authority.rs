//! # Static Namespace Authority
//!
//! Fixed, in-memory namespace table for running without a cluster.

use super::{NamespaceAuthority, NamespaceInfo};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Namespace authority backed by a fixed table
#[derive(Debug, Default)]
pub struct StaticNamespaceAuthority {
    namespaces: BTreeMap<String, NamespaceInfo>,
    lookups: AtomicUsize,
}

impl StaticNamespaceAuthority {
    /// Every listed namespace exists and carries `label_key=label_value`
    pub fn eligible<I, S>(namespaces: I, label_key: &str, label_value: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        namespaces
            .into_iter()
            .fold(Self::default(), |authority, ns| {
                authority.with_namespace(
                    ns,
                    NamespaceInfo {
                        labels: [(label_key.to_string(), label_value.to_string())].into(),
                    },
                )
            })
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>, info: NamespaceInfo) -> Self {
        self.namespaces.insert(namespace.into(), info);
        self
    }

    /// Number of lookups answered so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NamespaceAuthority for StaticNamespaceAuthority {
    async fn lookup(&self, namespace: &str) -> anyhow::Result<Option<NamespaceInfo>> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.namespaces.get(namespace).cloned())
    }
}
