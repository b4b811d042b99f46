//! # Namespace Secret Store
//!
//! Library behind the `secret-store` service and the `secretctl` client.
//!
//! - [`secrets`] resolves, validates and stores secret files on disk
//! - [`namespace`] decides which namespaces may hold secrets
//! - [`server`] maps HTTP methods on `/system/secrets` to store operations
//! - [`config`] reads the environment once at startup

pub mod config;
pub mod constants;
pub mod namespace;
pub mod observability;
pub mod runtime;
pub mod secrets;
pub mod server;
