//! Main orchestrator for the deploy operation
//!
//! Drives one deployment through its stages, strictly in order:
//!
//! 1. Resolving: load the local bundle, then find the service and its active version
//! 2. Cloning: clone the active version into the draft every later stage works on
//! 3. SyncingResources: reconcile each declared resource kind, plus settings
//! 4. SyncingLogic: replace the unprotected vcl files
//! 5. SettingEntryPoint: flag the configured main file
//! 6. Validating: ask the service to validate the draft
//! 7. Activating, possibly after AwaitingActivationDecision
//!
//! The first hard failure ends the run in `Failed(kind)`. Nothing applied to
//! the draft is rolled back; it stays inactive and inspectable.

use std::sync::Arc;

use super::{ActivationDecision, Stage};
use crate::api::ServiceApi;
use crate::config::DeployConfig;
use crate::domain::{DesiredState, ServiceSummary, SyncStep, VersionNumber};
use crate::error::{Result, deploy};
use crate::loader::BundleLoader;
use crate::sync::{
    EndpointAdapter, LogicSummary, ProtectRules, ReconcileSummary, assign_entry_point, reconcile,
    sync_logic_files,
};
use crate::ui::Reporter;

/// Options for a deployment
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Entry point file, with or without `.vcl`
    pub main: String,
    /// Skip the activation decision and activate once validation passes
    pub auto_activate: bool,
    pub rules: ProtectRules,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            main: "main.vcl".to_string(),
            auto_activate: false,
            rules: ProtectRules::default(),
        }
    }
}

impl From<&DeployConfig> for DeployOptions {
    fn from(config: &DeployConfig) -> Self {
        Self {
            main: config.main.clone(),
            auto_activate: config.activation.is_auto(),
            rules: config.rules.clone(),
        }
    }
}

/// Outcome of a finished deployment
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub service: ServiceSummary,
    /// The draft cloned by this run
    pub version: VersionNumber,
    pub activated: bool,
    pub resources: Vec<ReconcileSummary>,
    pub settings_applied: bool,
    pub logic: LogicSummary,
    pub entry_point: String,
}

/// Main orchestrator for the deploy operation
pub struct DeployOperation {
    api: ServiceApi,
    loader: Arc<dyn BundleLoader>,
    decision: Arc<dyn ActivationDecision>,
    reporter: Arc<dyn Reporter>,
    options: DeployOptions,
    history: Vec<Stage>,
}

impl DeployOperation {
    pub fn new(
        api: ServiceApi,
        loader: Arc<dyn BundleLoader>,
        decision: Arc<dyn ActivationDecision>,
        reporter: Arc<dyn Reporter>,
        options: DeployOptions,
    ) -> Self {
        Self {
            api,
            loader,
            decision,
            reporter,
            options,
            history: Vec::new(),
        }
    }

    /// Current stage, `None` before `execute` starts
    pub fn stage(&self) -> Option<Stage> {
        self.history.last().copied()
    }

    /// Every stage entered so far, in order
    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    /// Run the deployment to `Done` or `Failed`
    pub async fn execute(&mut self) -> Result<DeployReport> {
        match self.run_stages().await {
            Ok(report) => {
                self.enter(Stage::Done);
                Ok(report)
            }
            Err(e) => {
                self.reporter.end_phase();
                self.enter(Stage::Failed(e.kind()));
                Err(e)
            }
        }
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!(stage = %stage, "deployment stage");
        self.history.push(stage);
    }

    async fn run_stages(&mut self) -> Result<DeployReport> {
        self.enter(Stage::Resolving);
        let bundle = self.loader.load()?;
        let service = self.api.find_service().await?;

        self.enter(Stage::Cloning);
        let reporter = Arc::clone(&self.reporter);
        reporter.verbose(&format!(
            "Cloning active version {} of {}",
            service.active_version, service.name
        ));
        let version = self.api.clone_version(service.active_version).await?;
        reporter.verbose(&format!("Successfully cloned version {version}"));
        reporter.info("Cloned new version");

        self.enter(Stage::SyncingResources);
        let (resources, settings_applied) = match &bundle.desired {
            Some(desired) => self.sync_resources(version, desired).await?,
            None => (Vec::new(), false),
        };

        self.enter(Stage::SyncingLogic);
        let logic = sync_logic_files(
            &self.api,
            version,
            &bundle.logic_files,
            &self.options.rules,
            reporter.as_ref(),
        )
        .await?;

        self.enter(Stage::SettingEntryPoint);
        let entry_point = assign_entry_point(
            &self.api,
            version,
            &self.options.main,
            &logic.uploaded,
            reporter.as_ref(),
        )
        .await?;

        self.enter(Stage::Validating);
        reporter.verbose(&format!("Validate version {version}"));
        let validation = self.api.validate_version(version).await?;
        if !validation.is_ok() {
            return Err(deploy::validation(version.get(), validation.message()));
        }
        reporter.info(&format!("Version {version} looks ok"));

        let activate = if self.options.auto_activate {
            true
        } else {
            self.enter(Stage::AwaitingActivationDecision);
            self.decision.decide(&service, version).await?
        };

        if activate {
            self.enter(Stage::Activating);
            self.api
                .activate_version(version)
                .await
                .map_err(|e| deploy::activation(version.get(), e.to_string()))?;
            reporter.info(&format!("Activated version {version}"));
        } else {
            reporter.info(&format!("Version {version} left inactive"));
        }

        Ok(DeployReport {
            service,
            version,
            activated: activate,
            resources,
            settings_applied,
            logic,
            entry_point,
        })
    }

    /// Reconcile every kind the bundle declares; kinds it omits get no calls
    async fn sync_resources(
        &self,
        version: VersionNumber,
        desired: &DesiredState,
    ) -> Result<(Vec<ReconcileSummary>, bool)> {
        let reporter = self.reporter.as_ref();
        let rules = &self.options.rules;
        let mut summaries = Vec::new();
        let mut settings_applied = false;

        for step in desired.sync_plan() {
            match step {
                SyncStep::Kind(kind) => {
                    let Some(resources) = desired.resources_for(&kind) else {
                        continue;
                    };
                    reporter.begin_phase(&format!("Reconciling {kind}"));
                    let adapter = EndpointAdapter::new(&self.api, kind.clone());
                    let protect = |name: &str| rules.is_protected(&kind, name);
                    let result = reconcile(&adapter, version, resources, &protect, reporter).await;
                    reporter.end_phase();
                    summaries.push(result?);
                }
                SyncStep::Settings => {
                    if let Some(form) = desired.settings_form() {
                        reporter.verbose("update settings");
                        self.api.update_settings(version, form).await?;
                        reporter.verbose("✓ Setting updated");
                        reporter.info("Updated settings");
                        settings_applied = true;
                    }
                }
            }
        }

        Ok((summaries, settings_applied))
    }
}
