//! # Constants
//!
//! Default values for configuration read at startup.

/// Root directory under which namespace secret directories are created
pub const DEFAULT_SECRET_MOUNT_PATH: &str = "/var/lib/faasd-provider/secrets";

/// Namespace used when a request does not name one
pub const DEFAULT_NAMESPACE: &str = "openfaas-fn";

/// Label a namespace must carry to be eligible to hold secrets
pub const DEFAULT_NAMESPACE_LABEL_KEY: &str = "openfaas";

/// Required value of the eligibility label
pub const DEFAULT_NAMESPACE_LABEL_VALUE: &str = "true";

/// Namespace directories: owner rwx, group rx
pub const SECRET_DIR_MODE: u32 = 0o750;

/// Secret files: owner rw, group/other r
pub const SECRET_FILE_MODE: u32 = 0o644;

/// Directory under the mount path where secret files are written before being
/// renamed into their namespace. Not a valid namespace name.
pub const STAGING_DIR: &str = ".staging";

/// HTTP listen port for the secrets API, probes and metrics
pub const DEFAULT_PORT: u16 = 8081;

/// HTTP bind address
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Route serving list/create/delete
pub const SECRETS_ROUTE: &str = "/system/secrets";

/// How long to wait for the HTTP server to bind before giving up (seconds)
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 10;

/// How often to poll for server readiness during startup (milliseconds)
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 50;

/// Default URL `secretctl` talks to
pub const DEFAULT_SECRET_STORE_URL: &str = "http://127.0.0.1:8081";
