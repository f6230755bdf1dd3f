//! Command implementations for vcl-deploy CLI

pub mod completions;
pub mod deploy;
pub mod version;
