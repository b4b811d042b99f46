//! # Validation
//!
//! Secret name and namespace name checks. The name check is the only thing standing
//! between a caller-supplied name and a path outside the namespace directory, so it
//! must run before any write or delete path is built.

use super::error::SecretStoreError;
use regex::Regex;
use std::sync::LazyLock;

/// RFC 1123 label: [a-z0-9]([-a-z0-9]*[a-z0-9])?
static NAMESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$")
        .expect("Failed to compile namespace regex - this should never happen")
});

const MAX_NAMESPACE_LEN: usize = 63;

/// True when `name` contains a path separator or a `..` sequence
pub fn is_traversal(name: &str) -> bool {
    name.contains(['/', '\\']) || name.contains("..")
}

/// Validate a secret name before it is used as a filename
///
/// The name is used verbatim when valid; trimming only decides emptiness.
pub fn validate_secret_name(name: &str) -> Result<(), SecretStoreError> {
    if name.trim().is_empty() {
        return Err(SecretStoreError::EmptyName);
    }
    if is_traversal(name) {
        return Err(SecretStoreError::Traversal);
    }
    Ok(())
}

/// Whether `namespace` is a well-formed Kubernetes namespace name
pub fn is_valid_namespace_name(namespace: &str) -> bool {
    namespace.len() <= MAX_NAMESPACE_LEN && NAMESPACE_REGEX.is_match(namespace)
}
