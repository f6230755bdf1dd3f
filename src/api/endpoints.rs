//! Typed operations on one remote service

use std::sync::Arc;

use serde::Deserialize;

use super::{ApiClient, ApiRequest};
use crate::domain::{
    LogicFile, LogicFileSummary, Resource, ResourceKind, ServiceSummary, ValidationReport,
    VersionNumber,
};
use crate::error::{DeployError, Result, api};

const NOT_FOUND: u16 = 404;
const BAD_REQUEST: u16 = 400;

#[derive(Deserialize)]
struct ClonedVersion {
    number: VersionNumber,
}

/// The remote operations a deployment needs, bound to one service id
pub struct ServiceApi {
    client: Arc<ApiClient>,
    service_id: String,
}

impl ServiceApi {
    pub fn new(client: Arc<ApiClient>, service_id: impl Into<String>) -> Self {
        Self {
            client,
            service_id: service_id.into(),
        }
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    fn version_path(&self, version: VersionNumber, rest: &[&str]) -> Vec<String> {
        let mut segments = vec![
            "service".to_string(),
            self.service_id.clone(),
            "version".to_string(),
            version.to_string(),
        ];
        segments.extend(rest.iter().map(|s| (*s).to_string()));
        segments
    }

    fn kind_path(&self, version: VersionNumber, kind: &ResourceKind) -> Vec<String> {
        let mut segments = self.version_path(version, &[]);
        segments.extend(kind.endpoint_segments());
        segments
    }

    /// All services visible to the current credential
    pub async fn list_services(&self) -> Result<Vec<ServiceSummary>> {
        self.client.call_json(&ApiRequest::get(["service"])).await
    }

    /// The configured service, or `ServiceNotFound`
    pub async fn find_service(&self) -> Result<ServiceSummary> {
        self.list_services()
            .await?
            .into_iter()
            .find(|service| service.id == self.service_id)
            .ok_or_else(|| crate::error::deploy::service_not_found(&self.service_id))
    }

    /// Clone a version into a new editable draft and return its number
    pub async fn clone_version(&self, version: VersionNumber) -> Result<VersionNumber> {
        let request = ApiRequest::put(self.version_path(version, &["clone"]));
        let cloned: ClonedVersion = self.client.call_json(&request).await?;
        Ok(cloned.number)
    }

    pub async fn list_resources(
        &self,
        version: VersionNumber,
        kind: &ResourceKind,
    ) -> Result<Vec<Resource>> {
        let request = ApiRequest::get(self.kind_path(version, kind));
        self.client.call_json(&request).await
    }

    pub async fn create_resource(
        &self,
        version: VersionNumber,
        kind: &ResourceKind,
        resource: &Resource,
    ) -> Result<()> {
        let request = ApiRequest::post(self.kind_path(version, kind), resource.to_form());
        self.client.call(&request).await.map(drop)
    }

    /// Delete a resource by name; one that is already gone counts as deleted
    pub async fn delete_resource(
        &self,
        version: VersionNumber,
        kind: &ResourceKind,
        name: &str,
    ) -> Result<()> {
        let mut segments = self.kind_path(version, kind);
        segments.push(name.to_string());
        tolerate_missing(self.client.call(&ApiRequest::delete(segments)).await.map(drop))
    }

    /// Apply version-wide settings in one update
    pub async fn update_settings(
        &self,
        version: VersionNumber,
        settings: Vec<(String, String)>,
    ) -> Result<()> {
        let request = ApiRequest::put(self.version_path(version, &["settings"])).with_form(settings);
        self.client.call(&request).await.map(drop)
    }

    pub async fn list_logic_files(&self, version: VersionNumber) -> Result<Vec<LogicFileSummary>> {
        let request = ApiRequest::get(self.version_path(version, &["vcl"]));
        self.client.call_json(&request).await
    }

    pub async fn create_logic_file(&self, version: VersionNumber, file: &LogicFile) -> Result<()> {
        let request = ApiRequest::post(self.version_path(version, &["vcl"]), file.to_form());
        self.client.call(&request).await.map(drop)
    }

    pub async fn delete_logic_file(&self, version: VersionNumber, name: &str) -> Result<()> {
        let request = ApiRequest::delete(self.version_path(version, &["vcl", name]));
        tolerate_missing(self.client.call(&request).await.map(drop))
    }

    /// Mark a logic file as the entry point of the version
    pub async fn set_main_logic_file(&self, version: VersionNumber, name: &str) -> Result<()> {
        let request = ApiRequest::put(self.version_path(version, &["vcl", name, "main"]));
        self.client.call(&request).await.map(drop)
    }

    /// Ask the service to validate a version
    ///
    /// A 400 whose body is a validation report is returned as that report so
    /// the caller sees the service's message.
    pub async fn validate_version(&self, version: VersionNumber) -> Result<ValidationReport> {
        let request = ApiRequest::get(self.version_path(version, &["validate"]));
        match self.client.call_json(&request).await {
            Err(DeployError::Api { status, body, .. }) if status == BAD_REQUEST => {
                serde_json::from_str(&body)
                    .map_err(|_| api::rejected(request.method, request.path(), status, body))
            }
            other => other,
        }
    }

    pub async fn activate_version(&self, version: VersionNumber) -> Result<()> {
        let request = ApiRequest::put(self.version_path(version, &["activate"]));
        self.client.call(&request).await.map(drop)
    }
}

fn tolerate_missing(result: Result<()>) -> Result<()> {
    match result {
        Err(e) if e.status() == Some(NOT_FOUND) => Ok(()),
        other => other,
    }
}
