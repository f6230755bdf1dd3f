//! Resource descriptors
//!
//! A resource is a named configuration object (backend, condition, header, ...)
//! with an open set of attributes. Attributes are kept as JSON values so that
//! descriptors read from a bundle file and descriptors listed from the service
//! share one representation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named, typed configuration object belonging to a version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique name within its (version, kind)
    pub name: String,

    /// Remaining attributes as sent to or returned by the service
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Resource {
    /// Create a resource with no attributes besides its name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Flatten the descriptor into form parameters
    ///
    /// Strings are sent verbatim, numbers and booleans in their display form,
    /// arrays and objects as JSON text. Nulls are omitted.
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![("name".to_string(), self.name.clone())];
        form.extend(
            self.fields
                .iter()
                .filter(|(key, _)| key.as_str() != "name")
                .filter_map(|(key, value)| form_value(value).map(|v| (key.clone(), v))),
        );
        form
    }
}

fn form_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
