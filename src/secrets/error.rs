//! # Secret Store Error Types
//!
//! Every failure is terminal for the request that produced it. Errors are classified
//! into client errors (bad name, bad query, ineligible namespace) and server errors
//! (undecodable body, filesystem).

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single list/create/delete request
#[derive(Debug, Error)]
pub enum SecretStoreError {
    /// Request payload could not be parsed into a secret
    #[error("unable to decode secret request: {0}")]
    Decode(#[from] serde_json::Error),

    /// Query string could not be parsed
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// Secret name is empty or whitespace only
    #[error("non-empty name is required")]
    EmptyName,

    /// Secret name contains a path separator or `..`
    #[error("directory traversal found in name")]
    Traversal,

    /// Namespace does not exist or lacks the eligibility label
    #[error("namespace not valid: {0}")]
    InvalidNamespace(String),

    /// Namespace authority could not answer
    #[error("unable to look up namespace {namespace}: {message}")]
    NamespaceLookup { namespace: String, message: String },

    /// Any filesystem failure, including deleting a secret that does not exist
    #[error("{operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SecretStoreError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Whether the caller is at fault
    ///
    /// An undecodable body counts as a server error, like a filesystem failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Decode(_) | Self::Io { .. })
    }

    /// Short reason string for metrics labels and error bodies
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::InvalidQuery(_) => "invalid_query",
            Self::EmptyName => "empty_name",
            Self::Traversal => "traversal",
            Self::InvalidNamespace(_) => "invalid_namespace",
            Self::NamespaceLookup { .. } => "namespace_lookup",
            Self::Io { .. } => "io_error",
        }
    }
}
