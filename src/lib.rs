//! vcl-deploy - VCL and edge configuration deployment
//!
//! Deploys routing logic (`.vcl` files) and auxiliary resources (backends,
//! conditions, headers, response objects, cache settings, domains, health
//! checks and logging sinks) to a versioned CDN configuration service. Every run
//! clones the active version, rewrites the draft wholesale from a local bundle,
//! validates it and optionally activates it.
//!
//! The library exposes the pieces the binary is built from so they can be
//! driven programmatically:
//!
//! - [`api`]: credential pool, transport and the authenticated client
//! - [`loader`]: local `.vcl` files and the desired-state bundle
//! - [`sync`]: per-kind reconciliation and routing logic synchronisation
//! - [`operations`]: the deployment lifecycle
//! - [`ui`]: reporting and the activation prompt

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod operations;
pub mod sync;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod test_fixtures;
pub mod ui;

pub use error::{DeployError, Result};
