//! # Service Configuration
//!
//! Service-level configuration loaded from environment variables (populated from ConfigMap).
//!
//! All configuration has sensible defaults and can be overridden via environment variables.
//! Environment variables are populated from a ConfigMap using `envFrom` in the deployment.
//!
//! Configuration is read once at startup and is immutable afterwards. The store receives
//! its root path through [`StoreConfig`] rather than process-wide state, so several stores
//! with different roots can coexist.

mod server;
mod store;

pub use server::ServerConfig;
pub use store::{AuthorityKind, StoreConfig};

/// Load configuration from environment variables with defaults
pub fn load_config() -> (StoreConfig, ServerConfig) {
    (StoreConfig::from_env(), ServerConfig::from_env())
}

/// Read a value through `lookup` or return the default when unset or unparsable
pub(crate) fn var_or_default<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Process environment lookup used by the `from_env` constructors
pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
