//! Operations module for deploying to a service
//!
//! This module provides high-level operations that coordinate:
//! - DeployOperation: Complete deployment lifecycle
//!
//! The operations coordinate with:
//! - Loader: Local vcl files and desired state (from loader module)
//! - Sync: Resource and vcl reconciliation (from sync module)
//! - API: Service lookup, cloning, validation and activation (from api module)
//! - UI: Progress reporting and the activation prompt (from ui module)

pub mod deploy;

pub use deploy::{DeployOperation, DeployOptions, DeployReport, Stage};
