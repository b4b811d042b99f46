//! # Path Resolution
//!
//! Maps a namespace onto its directory under the root mount path.

use std::path::{Path, PathBuf};

/// Join the root mount path with `namespace` as a single segment
///
/// No I/O and no interpretation of the namespace; callers pass a namespace that
/// has already been through the namespace gate.
pub fn resolve_namespace_dir(root: &Path, namespace: &str) -> PathBuf {
    root.join(namespace)
}

/// Namespace named by a request, or `default` when absent or blank
pub fn request_namespace(requested: Option<&str>, default: &str) -> String {
    match requested.map(str::trim) {
        Some(ns) if !ns.is_empty() => ns.to_string(),
        _ => default.to_string(),
    }
}
