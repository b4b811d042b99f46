//! # Secrets
//!
//! Namespace-scoped secrets persisted as one file per secret:
//! `{mount_path}/{namespace}/{name}`.
//!
//! - `paths` - namespace directory resolution and namespace defaulting
//! - `validation` - secret name and namespace name checks
//! - `store` - list/create/delete against the filesystem
//! - `error` - error taxonomy shared with the HTTP layer

pub mod error;
pub mod paths;
pub mod store;
pub mod validation;

pub use error::SecretStoreError;
pub use store::SecretStore;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Secret as sent by callers to create or delete
///
/// `rawValue` travels base64-encoded. When both values are present the raw bytes win.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_bytes")]
    pub raw_value: Option<Vec<u8>>,
}

impl Secret {
    /// Decode a JSON request body
    pub fn from_json(body: &[u8]) -> Result<Self, SecretStoreError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Secret holding a text value
    pub fn with_value(name: impl Into<String>, namespace: Option<&str>, value: &str) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(ToString::to_string),
            value: Some(value.to_string()),
            raw_value: None,
        }
    }

    /// Secret holding raw bytes
    pub fn with_raw_value(name: impl Into<String>, namespace: Option<&str>, raw: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(ToString::to_string),
            value: None,
            raw_value: Some(raw),
        }
    }

    /// Bytes persisted for this secret
    pub fn payload(&self) -> Zeroizing<Vec<u8>> {
        match self.raw_value.as_deref() {
            Some(raw) if !raw.is_empty() => Zeroizing::new(raw.to_vec()),
            _ => Zeroizing::new(
                self.value
                    .as_deref()
                    .map(|v| v.as_bytes().to_vec())
                    .unwrap_or_default(),
            ),
        }
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

/// Entry returned by list; content is never included
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SecretSummary {
    pub name: String,
    pub namespace: String,
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option, reason = "signature required by serde(with)")]
    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_str(&STANDARD.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
