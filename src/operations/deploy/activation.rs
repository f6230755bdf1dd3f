//! Activation decision
//!
//! When a deployment is not set to activate automatically, the validated draft
//! waits on an [`ActivationDecision`]. The command line uses an interactive
//! prompt; library callers and tests inject a fixed answer.

use async_trait::async_trait;

use crate::domain::{ServiceSummary, VersionNumber};
use crate::error::{DeployError, Result};
use crate::ui::prompt;

#[async_trait]
pub trait ActivationDecision: Send + Sync {
    /// `true` activates the version, `false` leaves it as an inactive draft
    async fn decide(&self, service: &ServiceSummary, version: VersionNumber) -> Result<bool>;
}

/// Always activate
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoActivate;

#[async_trait]
impl ActivationDecision for AutoActivate {
    async fn decide(&self, _service: &ServiceSummary, _version: VersionNumber) -> Result<bool> {
        Ok(true)
    }
}

/// Never activate
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclineActivation;

#[async_trait]
impl ActivationDecision for DeclineActivation {
    async fn decide(&self, _service: &ServiceSummary, _version: VersionNumber) -> Result<bool> {
        Ok(false)
    }
}

/// Ask on the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptActivation;

#[async_trait]
impl ActivationDecision for PromptActivation {
    async fn decide(&self, service: &ServiceSummary, version: VersionNumber) -> Result<bool> {
        let service = service.clone();
        tokio::task::spawn_blocking(move || prompt::confirm_activation(&service, version))
            .await
            .map_err(|e| DeployError::PromptFailed {
                message: e.to_string(),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ServiceSummary {
        ServiceSummary {
            id: "svc".to_string(),
            name: "www".to_string(),
            active_version: VersionNumber(3),
        }
    }

    #[tokio::test]
    async fn test_fixed_decisions() {
        assert!(AutoActivate.decide(&service(), VersionNumber(4)).await.unwrap());
        assert!(
            !DeclineActivation
                .decide(&service(), VersionNumber(4))
                .await
                .unwrap()
        );
    }
}
