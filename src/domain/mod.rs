//! Domain models for vcl-deploy
//!
//! This module contains the plain data types the deployment works with:
//! remote services and versions, typed resource descriptors, routing logic
//! files and the locally authored desired state.

pub mod desired;
pub mod kind;
pub mod logic;
pub mod resource;
pub mod service;

pub use desired::{DesiredState, SyncStep};
pub use kind::ResourceKind;
pub use logic::{LOGIC_EXTENSION, LogicFile, LogicFileSummary, entry_point_name};
pub use resource::Resource;
pub use service::{ServiceSummary, ValidationReport, VersionNumber};
