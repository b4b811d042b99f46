//! # Secret Store
//!
//! List, create and delete secrets on the filesystem. There is no cache: every call
//! goes to the filesystem, so a create is visible to the next list.
//!
//! No locking is done here. Each create writes a complete file in the staging
//! directory and renames it over the target, so concurrent creates of the same
//! secret leave exactly one writer's content, never a mix. Directory creation
//! tolerates concurrent creators.

use super::paths::{request_namespace, resolve_namespace_dir};
use super::validation::validate_secret_name;
use super::{Secret, SecretStoreError, SecretSummary};
use crate::config::StoreConfig;
use crate::constants::{SECRET_DIR_MODE, SECRET_FILE_MODE, STAGING_DIR};
use crate::namespace::NamespaceGate;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Namespace-scoped secret store rooted at a mount path
#[derive(Debug, Clone)]
pub struct SecretStore {
    mount_path: PathBuf,
    default_namespace: String,
    gate: NamespaceGate,
}

impl SecretStore {
    pub fn new(config: &StoreConfig, gate: NamespaceGate) -> Self {
        Self {
            mount_path: config.mount_path.clone(),
            default_namespace: config.default_namespace.clone(),
            gate,
        }
    }

    pub fn mount_path(&self) -> &Path {
        &self.mount_path
    }

    /// Namespace a request operates on
    pub fn resolve_namespace(&self, requested: Option<&str>) -> String {
        request_namespace(requested, &self.default_namespace)
    }

    /// Names of the secrets in a namespace, sorted by name
    ///
    /// A namespace directory that does not exist yet lists as empty.
    pub async fn list(&self, namespace: Option<&str>) -> Result<Vec<SecretSummary>, SecretStoreError> {
        let namespace = self.resolve_namespace(namespace);
        self.gate.require(&namespace).await?;

        let dir = resolve_namespace_dir(&self.mount_path, &namespace);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(namespace = %namespace, "namespace directory absent, no secrets");
                return Ok(Vec::new());
            }
            Err(e) => return Err(SecretStoreError::io("read directory", dir, e)),
        };

        let mut secrets = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SecretStoreError::io("read directory", &dir, e))?
        {
            secrets.push(SecretSummary {
                name: entry.file_name().to_string_lossy().into_owned(),
                namespace: namespace.clone(),
            });
        }
        secrets.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(secrets)
    }

    /// Create or overwrite a secret
    ///
    /// Returns the path written.
    pub async fn create(&self, secret: &Secret) -> Result<PathBuf, SecretStoreError> {
        validate_secret_name(&secret.name)?;
        let namespace = self.resolve_namespace(secret.namespace.as_deref());
        self.gate.require(&namespace).await?;

        let dir = resolve_namespace_dir(&self.mount_path, &namespace);
        ensure_dir(&dir).await?;
        let staging = self.mount_path.join(STAGING_DIR);
        ensure_dir(&staging).await?;

        let path = dir.join(&secret.name);
        let payload = secret.payload();
        let bytes = payload.len();
        write_secret_file(staging, path.clone(), payload).await?;

        info!(namespace = %namespace, secret.name = %secret.name, bytes, "secret written");
        Ok(path)
    }

    /// Remove a secret; removing one that does not exist is an I/O error
    pub async fn delete(&self, secret: &Secret) -> Result<(), SecretStoreError> {
        validate_secret_name(&secret.name)?;
        let namespace = self.resolve_namespace(secret.namespace.as_deref());
        self.gate.require(&namespace).await?;

        let path = resolve_namespace_dir(&self.mount_path, &namespace).join(&secret.name);
        fs::remove_file(&path)
            .await
            .map_err(|e| SecretStoreError::io("remove", &path, e))?;

        info!(namespace = %namespace, secret.name = %secret.name, "secret removed");
        Ok(())
    }
}

/// Create a directory and any missing parents
///
/// Succeeds when the directory already exists or another request creates it first.
async fn ensure_dir(dir: &Path) -> Result<(), SecretStoreError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(SECRET_DIR_MODE);

    builder
        .create(dir)
        .await
        .map_err(|e| SecretStoreError::io("create directory", dir, e))
}

/// Write `payload` to a temporary file in `staging`, then rename it over `path`
async fn write_secret_file(
    staging: PathBuf,
    path: PathBuf,
    payload: Zeroizing<Vec<u8>>,
) -> Result<(), SecretStoreError> {
    let target = path.clone();
    tokio::task::spawn_blocking(move || persist_secret_file(&staging, &path, &payload))
        .await
        .map_err(|e| SecretStoreError::io("write", target, std::io::Error::other(e)))?
}

fn persist_secret_file(staging: &Path, path: &Path, payload: &[u8]) -> Result<(), SecretStoreError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".secret-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(SECRET_FILE_MODE));
    }

    let mut file = builder
        .tempfile_in(staging)
        .map_err(|e| SecretStoreError::io("create temporary file in", staging, e))?;
    file.write_all(payload)
        .map_err(|e| SecretStoreError::io("write", file.path(), e))?;
    file.as_file()
        .sync_all()
        .map_err(|e| SecretStoreError::io("sync", file.path(), e))?;

    // A failed rename drops the temporary file
    file.persist(path)
        .map_err(|e| SecretStoreError::io("rename into", path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::StaticNamespaceAuthority;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store_in(root: &Path, eligible: &[&str]) -> SecretStore {
        let config = StoreConfig::with_mount_path(root);
        let authority = StaticNamespaceAuthority::eligible(
            eligible.iter().copied(),
            &config.namespace_label_key,
            &config.namespace_label_value,
        );
        SecretStore::new(&config, NamespaceGate::new(Arc::new(authority), &config))
    }

    fn names(secrets: &[SecretSummary]) -> Vec<&str> {
        secrets.iter().map(|s| s.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_list_delete_round_trip() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &["team-a"]);

        let secret = Secret::with_value("db-pass", Some("team-a"), "hunter2");
        let path = store.create(&secret).await.unwrap();
        assert_eq!(path, root.path().join("team-a").join("db-pass"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hunter2");

        let listed = store.list(Some("team-a")).await.unwrap();
        assert_eq!(
            listed,
            vec![SecretSummary {
                name: "db-pass".to_string(),
                namespace: "team-a".to_string(),
            }]
        );

        store.delete(&secret).await.unwrap();
        assert!(!path.exists());
        assert!(store.list(Some("team-a")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_overwrites_existing_secret() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &["team-a"]);

        store
            .create(&Secret::with_value("token", Some("team-a"), "first-and-longer"))
            .await
            .unwrap();
        store
            .create(&Secret::with_value("token", Some("team-a"), "second"))
            .await
            .unwrap();

        let dir = root.path().join("team-a");
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);
        assert_eq!(std::fs::read(dir.join("token")).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_create_writes_raw_bytes() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &[]);

        let secret = Secret::with_raw_value("blob", None, vec![0xde, 0xad, 0xbe, 0xef]);
        let path = store.create(&secret).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[tokio::test]
    async fn test_traversal_writes_nothing() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &["team-a"]);

        for name in ["../evil", "nested/evil", ".."] {
            let err = store
                .create(&Secret::with_value(name, Some("team-a"), "x"))
                .await
                .unwrap_err();
            assert!(matches!(err, SecretStoreError::Traversal), "{name}: {err}");
        }
        // Nothing was created, not even the namespace directory
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &["team-a"]);

        for name in ["", "   "] {
            let err = store
                .create(&Secret::with_value(name, Some("team-a"), "x"))
                .await
                .unwrap_err();
            assert!(matches!(err, SecretStoreError::EmptyName));
        }
    }

    #[tokio::test]
    async fn test_delete_validates_name() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("outside"), b"keep").unwrap();
        let store = store_in(root.path(), &["team-a"]);

        let err = store
            .delete(&Secret::with_value("../outside", Some("team-a"), ""))
            .await
            .unwrap_err();
        assert!(matches!(err, SecretStoreError::Traversal));
        assert!(root.path().join("outside").exists());
    }

    #[tokio::test]
    async fn test_delete_missing_secret_is_io_error() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &["team-a"]);

        let err = store
            .delete(&Secret::with_value("ghost", Some("team-a"), ""))
            .await
            .unwrap_err();
        assert!(matches!(err, SecretStoreError::Io { .. }));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_namespace_defaults_when_absent() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &[]);

        store
            .create(&Secret::with_value("api-key", None, "abc"))
            .await
            .unwrap();
        assert!(root.path().join("openfaas-fn").join("api-key").exists());

        let listed = store.list(None).await.unwrap();
        assert_eq!(names(&listed), vec!["api-key"]);
        assert_eq!(listed[0].namespace, "openfaas-fn");
    }

    #[tokio::test]
    async fn test_list_rejects_ineligible_namespace() {
        let root = TempDir::new().unwrap();
        // Directory exists with content; an ineligible namespace must not expose it
        std::fs::create_dir_all(root.path().join("team-x")).unwrap();
        std::fs::write(root.path().join("team-x").join("leak"), b"x").unwrap();
        let store = store_in(root.path(), &["team-a"]);

        let err = store.list(Some("team-x")).await.unwrap_err();
        assert!(matches!(err, SecretStoreError::InvalidNamespace(ns) if ns == "team-x"));
    }

    #[tokio::test]
    async fn test_create_rejects_ineligible_namespace() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &["team-a"]);

        let err = store
            .create(&Secret::with_value("token", Some("team-x"), "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, SecretStoreError::InvalidNamespace(_)));
        assert!(!root.path().join("team-x").exists());
    }

    #[tokio::test]
    async fn test_list_empty_when_directory_absent_or_empty() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &["team-a"]);
        assert!(store.list(Some("team-a")).await.unwrap().is_empty());

        std::fs::create_dir_all(root.path().join("team-a")).unwrap();
        assert!(store.list(Some("team-a")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_scoped() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &["team-a", "team-b"]);

        for name in ["zeta", "alpha", "mid"] {
            store
                .create(&Secret::with_value(name, Some("team-a"), "v"))
                .await
                .unwrap();
        }
        store
            .create(&Secret::with_value("other", Some("team-b"), "v"))
            .await
            .unwrap();

        let listed = store.list(Some("team-a")).await.unwrap();
        assert_eq!(names(&listed), vec!["alpha", "mid", "zeta"]);
        assert!(listed.iter().all(|s| s.namespace == "team-a"));
    }

    #[tokio::test]
    async fn test_list_on_unreadable_path_is_io_error() {
        let root = TempDir::new().unwrap();
        // A file where the namespace directory should be
        std::fs::write(root.path().join("team-a"), b"not a directory").unwrap();
        let store = store_in(root.path(), &["team-a"]);

        let err = store.list(Some("team-a")).await.unwrap_err();
        assert!(matches!(err, SecretStoreError::Io { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_creates_same_namespace() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &["team-a"]);

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..8 {
            let store = store.clone();
            tasks.spawn(async move {
                store
                    .create(&Secret::with_value(format!("s{i}"), Some("team-a"), "v"))
                    .await
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }
        assert_eq!(store.list(Some("team-a")).await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_concurrent_writers_leave_one_complete_value() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &["team-a"]);
        let long = "L".repeat(4096);
        let values = [long.clone(), "s".to_string(), long, "s".to_string()];

        for _ in 0..100 {
            let mut tasks = tokio::task::JoinSet::new();
            for value in values.clone() {
                let store = store.clone();
                tasks.spawn(async move {
                    store
                        .create(&Secret::with_value("shared", Some("team-a"), &value))
                        .await
                });
            }
            while let Some(result) = tasks.join_next().await {
                result.unwrap().unwrap();
            }

            let content = std::fs::read_to_string(root.path().join("team-a").join("shared")).unwrap();
            assert!(
                values.contains(&content),
                "content mixes writers: len={} starts={:?}",
                content.len(),
                content.get(..3)
            );
        }

        let listed = store.list(Some("team-a")).await.unwrap();
        assert_eq!(names(&listed), vec!["shared"]);
    }

    #[tokio::test]
    async fn test_staging_files_do_not_leak() {
        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &["team-a"]);

        store
            .create(&Secret::with_value("db-pass", Some("team-a"), "hunter2"))
            .await
            .unwrap();

        let staging = root.path().join(STAGING_DIR);
        assert!(staging.is_dir());
        assert_eq!(std::fs::read_dir(&staging).unwrap().count(), 0);
        assert_eq!(names(&store.list(Some("team-a")).await.unwrap()), vec!["db-pass"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let store = store_in(root.path(), &["team-a"]);
        let path = store
            .create(&Secret::with_value("db-pass", Some("team-a"), "hunter2"))
            .await
            .unwrap();

        // Modes are subject to the process umask, which only removes bits
        let dir_mode = std::fs::metadata(root.path().join("team-a"))
            .unwrap()
            .permissions()
            .mode();
        let file_mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o027, 0, "namespace dir must not be group-writable or world-accessible");
        assert_eq!(file_mode & 0o133, 0, "secret file must not be executable or group/world-writable");
        assert_eq!(file_mode & 0o600, 0o600);
    }
}
