//! # Store Configuration
//!
//! Filesystem root, namespace defaults and namespace authority selection.

use super::{env_lookup, var_or_default};
use crate::constants::{
    DEFAULT_NAMESPACE, DEFAULT_NAMESPACE_LABEL_KEY, DEFAULT_NAMESPACE_LABEL_VALUE,
    DEFAULT_SECRET_MOUNT_PATH,
};
use std::path::PathBuf;
use std::str::FromStr;

/// Which namespace authority answers eligibility questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorityKind {
    /// Look namespaces up through the Kubernetes API
    #[default]
    Kubernetes,
    /// Fixed list from `STATIC_NAMESPACES`, no cluster access
    Static,
}

impl FromStr for AuthorityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kubernetes" | "k8s" => Ok(Self::Kubernetes),
            "static" => Ok(Self::Static),
            other => Err(format!(
                "unknown namespace authority '{other}', expected 'kubernetes' or 'static'"
            )),
        }
    }
}

/// Secret store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root mount path; each namespace gets one directory below it
    pub mount_path: PathBuf,
    /// Namespace used when a request omits one
    pub default_namespace: String,
    /// Label key marking a namespace as eligible
    pub namespace_label_key: String,
    /// Label value marking a namespace as eligible
    pub namespace_label_value: String,
    /// Namespace authority backend
    pub authority: AuthorityKind,
    /// Eligible namespaces for [`AuthorityKind::Static`]
    pub static_namespaces: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mount_path: PathBuf::from(DEFAULT_SECRET_MOUNT_PATH),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            namespace_label_key: DEFAULT_NAMESPACE_LABEL_KEY.to_string(),
            namespace_label_value: DEFAULT_NAMESPACE_LABEL_VALUE.to_string(),
            authority: AuthorityKind::default(),
            static_namespaces: Vec::new(),
        }
    }
}

impl StoreConfig {
    /// Config rooted at `mount_path` with every other field defaulted
    pub fn with_mount_path(mount_path: impl Into<PathBuf>) -> Self {
        Self {
            mount_path: mount_path.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            mount_path: var_or_default(&lookup, "SECRET_MOUNT_PATH", defaults.mount_path),
            default_namespace: var_or_default(
                &lookup,
                "DEFAULT_NAMESPACE",
                defaults.default_namespace,
            ),
            namespace_label_key: var_or_default(
                &lookup,
                "NAMESPACE_LABEL_KEY",
                defaults.namespace_label_key,
            ),
            namespace_label_value: var_or_default(
                &lookup,
                "NAMESPACE_LABEL_VALUE",
                defaults.namespace_label_value,
            ),
            authority: var_or_default(&lookup, "NAMESPACE_AUTHORITY", defaults.authority),
            static_namespaces: lookup("STATIC_NAMESPACES")
                .map(|v| parse_namespace_list(&v))
                .unwrap_or_default(),
        }
    }
}

/// Split a comma-separated namespace list, dropping blanks
fn parse_namespace_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
