//! Routing logic (VCL) files

use serde::Deserialize;

/// File extension of routing logic files
pub const LOGIC_EXTENSION: &str = "vcl";

/// A routing logic file loaded from disk, variables already substituted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicFile {
    /// Name used on the service: the file name without its `.vcl` extension
    pub name: String,
    pub content: String,
}

impl LogicFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn to_form(&self) -> Vec<(String, String)> {
        vec![
            ("name".to_string(), self.name.clone()),
            ("content".to_string(), self.content.clone()),
        ]
    }
}

/// A routing logic file as listed by the service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogicFileSummary {
    pub name: String,

    #[serde(default)]
    pub main: bool,
}

/// Normalise a configured entry point (`main.vcl` or `main`) to a file name on the service
pub fn entry_point_name(main: &str) -> &str {
    let main = main.trim();
    main.strip_suffix(".vcl").unwrap_or(main)
}
