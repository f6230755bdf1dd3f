//! Resource kinds reconciled during a deployment

use std::fmt;

/// Category of configuration object, reconciled independently of the others
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Healthcheck,
    Condition,
    Header,
    ResponseObject,
    CacheSettings,
    Backend,
    Domain,
    /// Logging sink of the given type (syslog, s3, logentries, ...)
    Logging(String),
}

impl ResourceKind {
    /// Non-logging kinds in the order they are reconciled
    pub const STANDARD: [ResourceKind; 7] = [
        ResourceKind::Healthcheck,
        ResourceKind::Condition,
        ResourceKind::Header,
        ResourceKind::ResponseObject,
        ResourceKind::CacheSettings,
        ResourceKind::Backend,
        ResourceKind::Domain,
    ];

    /// Path segments of the kind's collection below a version
    pub fn endpoint_segments(&self) -> Vec<String> {
        match self {
            Self::Healthcheck => vec!["healthcheck".to_string()],
            Self::Condition => vec!["condition".to_string()],
            Self::Header => vec!["header".to_string()],
            Self::ResponseObject => vec!["response_object".to_string()],
            Self::CacheSettings => vec!["cache_settings".to_string()],
            Self::Backend => vec!["backend".to_string()],
            Self::Domain => vec!["domain".to_string()],
            Self::Logging(sink) => vec!["logging".to_string(), sink.clone()],
        }
    }

    /// Key of the kind in a desired-state bundle and in skip filters
    pub fn bundle_key(&self) -> String {
        match self {
            Self::Healthcheck => "healthchecks".to_string(),
            Self::Condition => "conditions".to_string(),
            Self::Header => "headers".to_string(),
            Self::ResponseObject => "response_objects".to_string(),
            Self::CacheSettings => "cache_settings".to_string(),
            Self::Backend => "backends".to_string(),
            Self::Domain => "domains".to_string(),
            Self::Logging(sink) => format!("logging.{sink}"),
        }
    }

    /// Singular name used in progress lines
    pub fn label(&self) -> String {
        match self {
            Self::Healthcheck => "healthcheck".to_string(),
            Self::Condition => "condition".to_string(),
            Self::Header => "header".to_string(),
            Self::ResponseObject => "response object".to_string(),
            Self::CacheSettings => "cache settings".to_string(),
            Self::Backend => "backend".to_string(),
            Self::Domain => "domain".to_string(),
            Self::Logging(sink) => format!("logging {sink}"),
        }
    }

    /// Parse a bundle key, accepting singular forms and `logging.<sink>`
    pub fn from_bundle_key(key: &str) -> Option<Self> {
        let key = key.trim();
        if let Some(sink) = key.strip_prefix("logging.") {
            return (!sink.is_empty()).then(|| Self::Logging(sink.to_string()));
        }
        match key {
            "healthchecks" | "healthcheck" => Some(Self::Healthcheck),
            "conditions" | "condition" => Some(Self::Condition),
            "headers" | "header" => Some(Self::Header),
            "response_objects" | "response_object" => Some(Self::ResponseObject),
            "cache_settings" => Some(Self::CacheSettings),
            "backends" | "backend" => Some(Self::Backend),
            "domains" | "domain" => Some(Self::Domain),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logging(sink) => write!(f, "logging {sink}"),
            other => f.write_str(&other.bundle_key()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order() {
        let keys: Vec<String> = ResourceKind::STANDARD
            .iter()
            .map(ResourceKind::bundle_key)
            .collect();
        assert_eq!(
            keys,
            [
                "healthchecks",
                "conditions",
                "headers",
                "response_objects",
                "cache_settings",
                "backends",
                "domains"
            ]
        );
    }

    #[test]
    fn test_logging_endpoint() {
        let kind = ResourceKind::Logging("syslog".to_string());
        assert_eq!(kind.endpoint_segments(), ["logging", "syslog"]);
        assert_eq!(kind.bundle_key(), "logging.syslog");
        assert_eq!(kind.to_string(), "logging syslog");
    }

    #[test]
    fn test_from_bundle_key() {
        assert_eq!(
            ResourceKind::from_bundle_key("condition"),
            Some(ResourceKind::Condition)
        );
        assert_eq!(
            ResourceKind::from_bundle_key("response_objects"),
            Some(ResourceKind::ResponseObject)
        );
        assert_eq!(
            ResourceKind::from_bundle_key("logging.s3"),
            Some(ResourceKind::Logging("s3".to_string()))
        );
        assert_eq!(ResourceKind::from_bundle_key("logging."), None);
        assert_eq!(ResourceKind::from_bundle_key("vcl"), None);
    }

    #[test]
    fn test_bundle_key_round_trips_for_every_standard_kind() {
        for kind in ResourceKind::STANDARD {
            assert_eq!(ResourceKind::from_bundle_key(&kind.bundle_key()), Some(kind));
        }
    }
}
