//! Remote services and versions

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer identifier of a configuration version within a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionNumber(pub u32);

impl VersionNumber {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A service as listed by the remote configuration service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceSummary {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Currently active version
    #[serde(rename = "version")]
    pub active_version: VersionNumber,
}

/// Response of a version validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationReport {
    pub status: String,

    #[serde(default)]
    pub msg: Option<String>,

    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Message to surface to the operator when validation did not pass
    pub fn message(&self) -> String {
        if let Some(msg) = self.msg.as_deref().filter(|m| !m.is_empty()) {
            return msg.to_string();
        }
        if self.errors.is_empty() {
            return format!("status {}", self.status);
        }
        self.errors
            .iter()
            .map(|e| match e {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
