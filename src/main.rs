//! # Secret Store
//!
//! Serves namespace-scoped function secrets from a local directory tree.
//!
//! Each secret is a single file at `<mount path>/<namespace>/<name>`. Writes,
//! listings and deletes are only permitted in namespaces the namespace
//! authority reports as eligible (labelled `openfaas=true` by default), plus
//! the configured default namespace.
//!
//! ## Usage
//!
//! ```bash
//! SECRET_MOUNT_PATH=/var/lib/faasd-provider/secrets PORT=8081 secret-store
//! ```

use anyhow::Result;
use secret_store::runtime::{initialize, run};

#[tokio::main]
async fn main() -> Result<()> {
    let init = initialize().await?;
    run(init).await
}
