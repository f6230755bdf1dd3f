//! Common test utilities for vcl-deploy integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use assert_cmd::Command;
use tempfile::TempDir;

use vcl_deploy::api::{ApiClient, CredentialPool, ServiceApi};
use vcl_deploy::domain::{DesiredState, LogicFile};
use vcl_deploy::loader::{BundleLoader, StaticBundleLoader};
use vcl_deploy::operations::deploy::{ActivationDecision, DeployOperation, DeployOptions};
use vcl_deploy::test_fixtures::FakeService;
use vcl_deploy::ui::{RecordingReporter, Reporter};

/// Variables the binary reads that must not leak in from the host
const HOST_VARIABLES: [&str; 3] = ["FASTLY_APIKEY", "FASTLY_SERVICE_ID", "VCL_DEPLOY_CONFIG"];

/// Address nothing listens on, so any network call fails fast
pub const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:9";

/// The real binary, isolated from the host environment
#[allow(deprecated)]
pub fn vcl_deploy_cmd() -> Command {
    let mut cmd = Command::cargo_bin("vcl-deploy").unwrap();
    for name in HOST_VARIABLES {
        cmd.env_remove(name);
    }
    cmd
}

/// A scratch project directory with a `vcl/` folder
pub struct TestProject {
    pub temp: TempDir,
    pub path: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        std::fs::create_dir_all(path.join("vcl")).expect("Failed to create vcl directory");
        Self { temp, path }
    }

    /// Write a file relative to the project root
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Write `vcl/<name>.vcl`
    pub fn write_vcl(&self, name: &str, content: &str) {
        self.write_file(&format!("vcl/{name}.vcl"), content);
    }

    pub fn vcl_dir(&self) -> PathBuf {
        self.path.join("vcl")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// A deployment of service `svc` on `fake` using `keys` in order
pub fn deploy_operation(
    fake: &Arc<FakeService>,
    keys: &[&str],
    loader: Arc<dyn BundleLoader>,
    decision: Arc<dyn ActivationDecision>,
    options: DeployOptions,
) -> (DeployOperation, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::new());
    let client = ApiClient::new(
        fake.clone(),
        CredentialPool::from_keys(keys.iter().copied()),
        reporter.clone() as Arc<dyn Reporter>,
    );
    let operation = DeployOperation::new(
        ServiceApi::new(Arc::new(client), "svc"),
        loader,
        decision,
        reporter.clone() as Arc<dyn Reporter>,
        options,
    );
    (operation, reporter)
}

/// Loader over a single `main` logic file plus the given desired state
pub fn static_loader(desired: Option<DesiredState>) -> Arc<dyn BundleLoader> {
    Arc::new(StaticBundleLoader::new(
        vec![LogicFile::new("main", "sub vcl_recv { return(lookup); }")],
        desired,
    ))
}

/// Parse a desired-state bundle from a JSON literal
pub fn desired(value: serde_json::Value) -> DesiredState {
    serde_json::from_value(value).expect("Invalid desired state")
}
