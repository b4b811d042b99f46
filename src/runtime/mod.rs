//! # Runtime Module
//!
//! Runtime components for the secret store service: initialization and the
//! serve loop with readiness polling and graceful shutdown.

pub mod initialization;
pub mod serve;

pub use initialization::*;
pub use serve::*;
