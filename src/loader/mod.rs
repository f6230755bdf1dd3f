//! Local bundle loading
//!
//! Reads the routing logic files and the optional desired-state bundle a
//! deployment works from. Everything here happens before the first remote call,
//! so a missing variable or a malformed bundle never leaves a half-built draft.
//!
//! - [`logic_files`]: `.vcl` discovery and `${NAME}` substitution
//! - [`desired`]: desired-state bundle file parsing (JSON or YAML)

pub mod desired;
pub mod logic_files;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::{DesiredState, LogicFile};
use crate::error::Result;

pub use desired::load_desired_state;
pub use logic_files::{discover_logic_files, substitute_variables};

/// Everything a deployment uploads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedBundle {
    pub logic_files: Vec<LogicFile>,
    /// `None` when no bundle file was configured
    pub desired: Option<DesiredState>,
}

/// Source of the local artifacts of a deployment
pub trait BundleLoader: Send + Sync {
    fn load(&self) -> Result<LoadedBundle>;
}

/// Loads logic files from folders and the desired state from a file
#[derive(Debug, Clone, Default)]
pub struct FsBundleLoader {
    pub folders: Vec<PathBuf>,
    /// Variable names substituted in logic files
    pub vars: Vec<String>,
    /// Values to substitute, usually a snapshot of the process environment
    pub values: HashMap<String, String>,
    pub desired_state: Option<PathBuf>,
}

impl BundleLoader for FsBundleLoader {
    fn load(&self) -> Result<LoadedBundle> {
        let files = discover_logic_files(&self.folders)?;
        let logic_files = substitute_variables(files, &self.vars, &self.values)?;
        let desired = self
            .desired_state
            .as_deref()
            .map(load_desired_state)
            .transpose()?;
        Ok(LoadedBundle {
            logic_files,
            desired,
        })
    }
}

/// Loader over artifacts already in memory
#[derive(Debug, Clone, Default)]
pub struct StaticBundleLoader {
    bundle: LoadedBundle,
}

impl StaticBundleLoader {
    pub fn new(logic_files: Vec<LogicFile>, desired: Option<DesiredState>) -> Self {
        Self {
            bundle: LoadedBundle {
                logic_files,
                desired,
            },
        }
    }
}

impl BundleLoader for StaticBundleLoader {
    fn load(&self) -> Result<LoadedBundle> {
        Ok(self.bundle.clone())
    }
}
