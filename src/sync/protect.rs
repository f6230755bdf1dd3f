//! Protect and skip filters

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::ResourceKind;

/// Names a deployment must leave in place
///
/// Resource kinds are protected by exact name. Logic files are protected when
/// their name contains any of the configured substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectRules {
    skip: BTreeMap<ResourceKind, BTreeSet<String>>,
    logic_substrings: Vec<String>,
}

impl ProtectRules {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn skip(mut self, kind: ResourceKind, name: impl Into<String>) -> Self {
        self.add_skip(kind, name);
        self
    }

    #[must_use]
    pub fn protect_logic(mut self, substring: impl Into<String>) -> Self {
        self.add_logic_substring(substring);
        self
    }

    pub fn add_skip(&mut self, kind: ResourceKind, name: impl Into<String>) {
        self.skip.entry(kind).or_default().insert(name.into());
    }

    pub fn add_logic_substring(&mut self, substring: impl Into<String>) {
        let substring = substring.into();
        if !substring.is_empty() {
            self.logic_substrings.push(substring);
        }
    }

    pub fn is_protected(&self, kind: &ResourceKind, name: &str) -> bool {
        self.skip.get(kind).is_some_and(|names| names.contains(name))
    }

    pub fn is_logic_protected(&self, name: &str) -> bool {
        self.logic_substrings.iter().any(|s| name.contains(s.as_str()))
    }

    /// Exact names protected for a kind
    pub fn skipped(&self, kind: &ResourceKind) -> impl Iterator<Item = &str> {
        self.skip.get(kind).into_iter().flatten().map(String::as_str)
    }

    pub fn logic_substrings(&self) -> &[String] {
        &self.logic_substrings
    }
}
