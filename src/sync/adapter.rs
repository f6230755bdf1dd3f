//! Resource kind adapters

use async_trait::async_trait;

use crate::api::ServiceApi;
use crate::domain::{Resource, ResourceKind, VersionNumber};
use crate::error::Result;

/// The three operations reconciliation needs for one resource kind
#[async_trait]
pub trait ResourceAdapter: Send + Sync {
    fn kind(&self) -> &ResourceKind;

    async fn list(&self, version: VersionNumber) -> Result<Vec<Resource>>;

    async fn create(&self, version: VersionNumber, resource: &Resource) -> Result<()>;

    async fn delete(&self, version: VersionNumber, name: &str) -> Result<()>;
}

/// Adapter backed by the kind's collection endpoint
pub struct EndpointAdapter<'a> {
    api: &'a ServiceApi,
    kind: ResourceKind,
}

impl<'a> EndpointAdapter<'a> {
    pub fn new(api: &'a ServiceApi, kind: ResourceKind) -> Self {
        Self { api, kind }
    }
}

#[async_trait]
impl ResourceAdapter for EndpointAdapter<'_> {
    fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    async fn list(&self, version: VersionNumber) -> Result<Vec<Resource>> {
        self.api.list_resources(version, &self.kind).await
    }

    async fn create(&self, version: VersionNumber, resource: &Resource) -> Result<()> {
        self.api.create_resource(version, &self.kind, resource).await
    }

    async fn delete(&self, version: VersionNumber, name: &str) -> Result<()> {
        self.api.delete_resource(version, &self.kind, name).await
    }
}
