//! Lifecycle stages of a deployment

use std::fmt;

use crate::error::ErrorKind;

/// Where a deployment is in its lifecycle
///
/// Stages only ever move forward. `Failed` is terminal and can be entered from
/// any other stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Cloning,
    SyncingResources,
    SyncingLogic,
    SettingEntryPoint,
    Validating,
    AwaitingActivationDecision,
    Activating,
    Done,
    Failed(ErrorKind),
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolving => f.write_str("resolving service"),
            Self::Cloning => f.write_str("cloning active version"),
            Self::SyncingResources => f.write_str("syncing resources"),
            Self::SyncingLogic => f.write_str("syncing vcl"),
            Self::SettingEntryPoint => f.write_str("setting entry point"),
            Self::Validating => f.write_str("validating"),
            Self::AwaitingActivationDecision => f.write_str("awaiting activation decision"),
            Self::Activating => f.write_str("activating"),
            Self::Done => f.write_str("done"),
            Self::Failed(kind) => write!(f, "failed ({kind})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_stages() {
        assert!(Stage::Done.is_terminal());
        assert!(Stage::Failed(ErrorKind::ValidationError).is_terminal());
        assert!(!Stage::Validating.is_terminal());
    }

    #[test]
    fn test_failed_display_names_kind() {
        assert_eq!(
            Stage::Failed(ErrorKind::ServiceNotFound).to_string(),
            "failed (service not found)"
        );
    }
}
