//! Desired-state bundle
//!
//! What each resource kind should contain once the deployment is done. A kind
//! that is absent from the bundle is "no instruction": its remote resources are
//! left untouched. A kind present with an empty list means "delete all
//! unprotected".

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

use super::{Resource, ResourceKind};
use crate::error::{Result, config};

/// Locally authored description of the post-deployment configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesiredState {
    pub healthchecks: Option<Vec<Resource>>,
    pub conditions: Option<Vec<Resource>>,
    pub headers: Option<Vec<Resource>>,
    pub response_objects: Option<Vec<Resource>>,
    pub cache_settings: Option<Vec<Resource>>,
    pub backends: Option<Vec<Resource>>,
    pub domains: Option<Vec<Resource>>,

    /// Version-wide settings, applied with a single update
    pub settings: Option<BTreeMap<String, Value>>,

    /// Logging sinks keyed by sink type
    #[serde(default, alias = "loggers")]
    pub logging: BTreeMap<String, Vec<Resource>>,
}

/// One step of the resource synchronisation stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStep {
    Kind(ResourceKind),
    Settings,
}

impl DesiredState {
    /// Desired resources of a kind, or `None` if the bundle does not mention it
    pub fn resources_for(&self, kind: &ResourceKind) -> Option<&[Resource]> {
        let resources = match kind {
            ResourceKind::Healthcheck => self.healthchecks.as_ref(),
            ResourceKind::Condition => self.conditions.as_ref(),
            ResourceKind::Header => self.headers.as_ref(),
            ResourceKind::ResponseObject => self.response_objects.as_ref(),
            ResourceKind::CacheSettings => self.cache_settings.as_ref(),
            ResourceKind::Backend => self.backends.as_ref(),
            ResourceKind::Domain => self.domains.as_ref(),
            ResourceKind::Logging(sink) => self.logging.get(sink),
        };
        resources.map(Vec::as_slice)
    }

    /// Kinds declared by the bundle, in reconciliation order
    pub fn declared_kinds(&self) -> Vec<ResourceKind> {
        ResourceKind::STANDARD
            .into_iter()
            .filter(|kind| self.resources_for(kind).is_some())
            .chain(self.logging.keys().cloned().map(ResourceKind::Logging))
            .collect()
    }

    /// Ordered plan for the resource stage
    ///
    /// Settings are applied after cache settings and before backends.
    pub fn sync_plan(&self) -> Vec<SyncStep> {
        let mut plan = Vec::new();
        for kind in self.declared_kinds() {
            if self.settings.is_some() && kind == ResourceKind::Backend {
                plan.push(SyncStep::Settings);
            }
            plan.push(SyncStep::Kind(kind));
        }
        if self.settings.is_some() && !plan.contains(&SyncStep::Settings) {
            let position = plan
                .iter()
                .position(|step| match step {
                    SyncStep::Kind(kind) => matches!(
                        kind,
                        ResourceKind::Backend | ResourceKind::Domain | ResourceKind::Logging(_)
                    ),
                    SyncStep::Settings => false,
                })
                .unwrap_or(plan.len());
            plan.insert(position, SyncStep::Settings);
        }
        plan
    }

    /// Settings flattened to form parameters
    pub fn settings_form(&self) -> Option<Vec<(String, String)>> {
        self.settings.as_ref().map(|settings| {
            settings
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (key.clone(), value)
                })
                .collect()
        })
    }

    /// Check that names are non-empty and unique per kind
    pub fn validate(&self) -> Result<()> {
        for kind in self.declared_kinds() {
            let mut seen = HashSet::new();
            for resource in self.resources_for(&kind).unwrap_or_default() {
                if resource.name.trim().is_empty() {
                    return Err(config::invalid(format!(
                        "{kind} contains an entry without a name"
                    )));
                }
                if !seen.insert(resource.name.as_str()) {
                    return Err(config::invalid(format!(
                        "{kind} declares '{}' more than once",
                        resource.name
                    )));
                }
            }
        }
        for sink in self.logging.keys() {
            if sink.is_empty() || sink.contains('/') {
                return Err(config::invalid(format!(
                    "Invalid logging sink type '{sink}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle(value: Value) -> DesiredState {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_absent_kind_is_not_declared() {
        let desired = bundle(json!({"backends": [{"name": "origin1"}]}));
        assert_eq!(desired.declared_kinds(), vec![ResourceKind::Backend]);
        assert!(desired.resources_for(&ResourceKind::Condition).is_none());
    }

    #[test]
    fn test_empty_kind_is_declared() {
        let desired = bundle(json!({"headers": []}));
        assert_eq!(desired.resources_for(&ResourceKind::Header), Some(&[][..]));
    }

    #[test]
    fn test_declared_kinds_follow_fixed_order_then_logging() {
        let desired = bundle(json!({
            "domains": [],
            "logging": {"syslog": [], "s3": []},
            "healthchecks": [],
            "backends": []
        }));
        assert_eq!(
            desired.declared_kinds(),
            vec![
                ResourceKind::Healthcheck,
                ResourceKind::Backend,
                ResourceKind::Domain,
                ResourceKind::Logging("s3".to_string()),
                ResourceKind::Logging("syslog".to_string()),
            ]
        );
    }

    #[test]
    fn test_settings_slot_before_backends() {
        let desired = bundle(json!({
            "cache_settings": [],
            "settings": {"general.default_ttl": 3600},
            "backends": []
        }));
        assert_eq!(
            desired.sync_plan(),
            vec![
                SyncStep::Kind(ResourceKind::CacheSettings),
                SyncStep::Settings,
                SyncStep::Kind(ResourceKind::Backend),
            ]
        );
    }

    #[test]
    fn test_settings_without_backends_goes_before_domains() {
        let desired = bundle(json!({
            "conditions": [],
            "settings": {"general.default_ttl": 3600},
            "domains": []
        }));
        assert_eq!(
            desired.sync_plan(),
            vec![
                SyncStep::Kind(ResourceKind::Condition),
                SyncStep::Settings,
                SyncStep::Kind(ResourceKind::Domain),
            ]
        );
    }

    #[test]
    fn test_settings_alone() {
        let desired = bundle(json!({"settings": {"general.default_host": "www"}}));
        assert_eq!(desired.sync_plan(), vec![SyncStep::Settings]);
        assert_eq!(
            desired.settings_form(),
            Some(vec![(
                "general.default_host".to_string(),
                "www".to_string()
            )])
        );
    }

    #[test]
    fn test_loggers_alias() {
        let desired = bundle(json!({"loggers": {"ftp": [{"name": "archive"}]}}));
        assert_eq!(
            desired.declared_kinds(),
            vec![ResourceKind::Logging("ftp".to_string())]
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result: std::result::Result<DesiredState, _> =
            serde_json::from_value(json!({"backend": []}));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let desired = bundle(json!({"backends": [{"name": "a"}, {"name": "a"}]}));
        let err = desired.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_validate_rejects_blank_names() {
        let desired = bundle(json!({"conditions": [{"name": " "}]}));
        assert!(desired.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_same_name_across_kinds() {
        let desired = bundle(json!({
            "backends": [{"name": "shared"}],
            "conditions": [{"name": "shared"}]
        }));
        assert!(desired.validate().is_ok());
    }
}
