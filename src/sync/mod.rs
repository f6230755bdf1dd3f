//! Synchronisation of a draft version toward the desired state
//!
//! - [`adapter`]: per-kind list/create/delete operations behind one trait
//! - [`protect`]: names that are never deleted
//! - [`reconcile`]: the generic delete-then-create primitive
//! - [`logic`]: routing logic files and the entry point

pub mod adapter;
pub mod logic;
pub mod protect;
pub mod reconcile;

pub use adapter::{EndpointAdapter, ResourceAdapter};
pub use logic::{LogicSummary, assign_entry_point, sync_logic_files};
pub use protect::ProtectRules;
pub use reconcile::{ReconcileSummary, reconcile};
