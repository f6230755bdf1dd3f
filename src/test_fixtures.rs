//! Test fixtures and utilities for reducing test setup duplication.
//!
//! [`FakeService`] is an in-memory stand-in for the remote configuration
//! service. It implements [`Transport`], so an [`ApiClient`](crate::api::ApiClient)
//! built on it exercises the real request building and response classification.
//!
//! # Usage
//!
//! ```ignore
//! use vcl_deploy::test_fixtures::FakeService;
//!
//! let fake = Arc::new(FakeService::new("svc", 3));
//! fake.seed_resource(3, &ResourceKind::Backend, Resource::new("old1"));
//! fake.rate_limit_key("k1");
//! // ... run a deployment against `fake` ...
//! assert_eq!(fake.active_version(), 4);
//! ```
//!
//! Behaviour worth knowing when writing tests:
//!
//! - Cloning copies the full state of the source version into `max + 1`
//! - Mutating the active version is rejected with 400, like a locked version
//! - Deleting something that does not exist answers 404
//! - Rate-limited keys answer 429 with the rate limit message on every request

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::api::{ApiRequest, Credential, Method, RATE_LIMIT_MARKER, RawResponse, Transport};
use crate::domain::{Resource, ResourceKind};
use crate::error::Result;

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// One request as seen by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub key: String,
    pub form: Option<Vec<(String, String)>>,
}

/// A logic file stored on a fake version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLogicFile {
    pub name: String,
    pub content: String,
    pub main: bool,
}

#[derive(Debug, Clone, Default)]
struct VersionState {
    /// Keyed by the collection path below the version, e.g. `backend` or `logging/s3`
    resources: BTreeMap<String, Vec<Resource>>,
    logic_files: Vec<StoredLogicFile>,
    settings: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
struct Injected {
    method: Method,
    path: String,
    status: u16,
    body: String,
}

#[derive(Debug)]
struct State {
    service_id: String,
    name: String,
    active: u32,
    versions: BTreeMap<u32, VersionState>,
    requests: Vec<RecordedRequest>,
    limited_keys: HashSet<String>,
    failures: Vec<Injected>,
    validation_error: Option<String>,
}

/// In-memory remote configuration service
#[derive(Debug)]
pub struct FakeService {
    state: Mutex<State>,
}

impl FakeService {
    /// A service whose versions `1..=active` exist and `active` is live
    pub fn new(service_id: impl Into<String>, active: u32) -> Self {
        let versions = (1..=active.max(1))
            .map(|number| (number, VersionState::default()))
            .collect();
        Self {
            state: Mutex::new(State {
                service_id: service_id.into(),
                name: "www".to_string(),
                active,
                versions,
                requests: Vec::new(),
                limited_keys: HashSet::new(),
                failures: Vec::new(),
                validation_error: None,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn seed_resource(&self, version: u32, kind: &ResourceKind, resource: Resource) {
        let key = kind.endpoint_segments().join("/");
        self.lock()
            .versions
            .entry(version)
            .or_default()
            .resources
            .entry(key)
            .or_default()
            .push(resource);
    }

    pub fn seed_logic_file(&self, version: u32, name: &str, content: &str, main: bool) {
        self.lock()
            .versions
            .entry(version)
            .or_default()
            .logic_files
            .push(StoredLogicFile {
                name: name.to_string(),
                content: content.to_string(),
                main,
            });
    }

    /// Every request made with `key` answers 429
    pub fn rate_limit_key(&self, key: &str) {
        self.lock().limited_keys.insert(key.to_string());
    }

    /// Answer `method path` with the given status and body from now on
    pub fn fail_on(&self, method: Method, path: &str, status: u16, body: &str) {
        self.lock().failures.push(Injected {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
    }

    /// Validation of any version reports this message
    pub fn fail_validation(&self, message: &str) {
        self.lock().validation_error = Some(message.to_string());
    }

    pub fn active_version(&self) -> u32 {
        self.lock().active
    }

    pub fn latest_version(&self) -> u32 {
        self.lock().versions.keys().next_back().copied().unwrap_or(0)
    }

    pub fn resources(&self, version: u32, kind: &ResourceKind) -> Vec<Resource> {
        let key = kind.endpoint_segments().join("/");
        self.lock()
            .versions
            .get(&version)
            .and_then(|v| v.resources.get(&key).cloned())
            .unwrap_or_default()
    }

    pub fn resource_names(&self, version: u32, kind: &ResourceKind) -> Vec<String> {
        let mut names: Vec<String> = self
            .resources(version, kind)
            .into_iter()
            .map(|r| r.name)
            .collect();
        names.sort();
        names
    }

    pub fn logic_files(&self, version: u32) -> Vec<StoredLogicFile> {
        self.lock()
            .versions
            .get(&version)
            .map(|v| v.logic_files.clone())
            .unwrap_or_default()
    }

    pub fn settings(&self, version: u32) -> BTreeMap<String, String> {
        self.lock()
            .versions
            .get(&version)
            .map(|v| v.settings.clone())
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests with the given method whose path contains `needle`
    pub fn requests_matching(&self, method: Method, needle: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path.contains(needle))
            .collect()
    }

    /// Requests that were not plain reads
    pub fn mutations(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::Get)
            .collect()
    }
}

#[async_trait]
impl Transport for FakeService {
    async fn send(&self, request: &ApiRequest, credential: &Credential) -> Result<RawResponse> {
        let mut state = self.lock();
        let path = request.path();
        state.requests.push(RecordedRequest {
            method: request.method,
            path: path.clone(),
            key: credential.expose().to_string(),
            form: request.form.clone(),
        });

        if state.limited_keys.contains(credential.expose()) {
            return Ok(RawResponse::json(
                429,
                &json!({"msg": RATE_LIMIT_MARKER, "detail": "Retry after the top of the hour"}),
            ));
        }
        if let Some(failure) = state
            .failures
            .iter()
            .find(|f| f.method == request.method && f.path == path)
        {
            return Ok(RawResponse::new(
                failure.status,
                Some("application/json"),
                failure.body.clone(),
            ));
        }

        Ok(state.route(request))
    }
}

fn not_found(what: &str) -> RawResponse {
    RawResponse::json(404, &json!({"msg": "Record not found", "detail": what}))
}

fn bad_request(msg: &str) -> RawResponse {
    RawResponse::json(400, &json!({"msg": msg}))
}

fn ok() -> RawResponse {
    RawResponse::json(200, &json!({"status": "ok"}))
}

fn form_to_resource(form: Option<&Vec<(String, String)>>) -> Option<Resource> {
    let form = form?;
    let name = form.iter().find(|(k, _)| k == "name")?.1.clone();
    let mut resource = Resource::new(name);
    for (key, value) in form.iter().filter(|(k, _)| k != "name") {
        resource
            .fields
            .insert(key.clone(), Value::String(value.clone()));
    }
    Some(resource)
}

impl State {
    fn route(&mut self, request: &ApiRequest) -> RawResponse {
        let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
        match segments.as_slice() {
            ["service"] if request.method == Method::Get => RawResponse::json(
                200,
                &json!([{"id": self.service_id, "name": self.name, "version": self.active}]),
            ),
            ["service", sid, "version", version, rest @ ..] => {
                if *sid != self.service_id {
                    return not_found("service");
                }
                let Ok(version) = version.parse::<u32>() else {
                    return bad_request("Invalid version");
                };
                if !self.versions.contains_key(&version) {
                    return not_found("version");
                }
                self.route_version(request, version, rest)
            }
            _ => not_found("route"),
        }
    }

    fn route_version(&mut self, request: &ApiRequest, version: u32, rest: &[&str]) -> RawResponse {
        let method = request.method;
        let locked = version == self.active;
        if locked && !matches!(method, Method::Get) && !matches!(rest, ["clone" | "activate"]) {
            return bad_request("Version is locked");
        }

        match (method, rest) {
            (Method::Put, ["clone"]) => {
                let number = self.versions.keys().next_back().copied().unwrap_or(0) + 1;
                let copy = self.versions.get(&version).cloned().unwrap_or_default();
                self.versions.insert(number, copy);
                RawResponse::json(200, &json!({"number": number, "active": false}))
            }
            (Method::Put, ["activate"]) => {
                self.active = version;
                RawResponse::json(200, &json!({"number": version, "active": true}))
            }
            (Method::Get, ["validate"]) => match &self.validation_error {
                Some(message) => RawResponse::json(
                    400,
                    &json!({"status": "error", "msg": message, "errors": [message]}),
                ),
                None => RawResponse::json(200, &json!({"status": "ok", "errors": []})),
            },
            (Method::Put, ["settings"]) => {
                let Some(state) = self.versions.get_mut(&version) else {
                    return not_found("version");
                };
                for (key, value) in request.form.iter().flatten() {
                    state.settings.insert(key.clone(), value.clone());
                }
                RawResponse::json(200, &json!(state.settings))
            }
            (_, ["vcl", tail @ ..]) => self.route_logic(request, version, tail),
            (_, ["logging", sink, tail @ ..]) => {
                let collection = format!("logging/{sink}");
                self.route_resources(request, version, &collection, tail)
            }
            (_, [collection, tail @ ..]) => {
                self.route_resources(request, version, collection, tail)
            }
            _ => not_found("route"),
        }
    }

    fn route_resources(
        &mut self,
        request: &ApiRequest,
        version: u32,
        collection: &str,
        tail: &[&str],
    ) -> RawResponse {
        let Some(state) = self.versions.get_mut(&version) else {
            return not_found("version");
        };
        let items = state.resources.entry(collection.to_string()).or_default();
        match (request.method, tail) {
            (Method::Get, []) => RawResponse::json(200, &json!(items)),
            (Method::Post, []) => {
                let Some(resource) = form_to_resource(request.form.as_ref()) else {
                    return bad_request("Missing name");
                };
                if items.iter().any(|r| r.name == resource.name) {
                    return RawResponse::json(
                        409,
                        &json!({"msg": "Duplicate record", "detail": resource.name}),
                    );
                }
                let body = json!(resource);
                items.push(resource);
                RawResponse::json(200, &body)
            }
            (Method::Delete, [name]) => {
                let before = items.len();
                items.retain(|r| r.name != *name);
                if items.len() == before {
                    not_found(name)
                } else {
                    ok()
                }
            }
            _ => not_found("route"),
        }
    }

    fn route_logic(&mut self, request: &ApiRequest, version: u32, tail: &[&str]) -> RawResponse {
        let Some(state) = self.versions.get_mut(&version) else {
            return not_found("version");
        };
        match (request.method, tail) {
            (Method::Get, []) => {
                let listing: Vec<Value> = state
                    .logic_files
                    .iter()
                    .map(|f| json!({"name": f.name, "content": f.content, "main": f.main}))
                    .collect();
                RawResponse::json(200, &json!(listing))
            }
            (Method::Post, []) => {
                let form = request.form.clone().unwrap_or_default();
                let field = |key: &str| {
                    form.iter()
                        .find(|(k, _)| k == key)
                        .map(|(_, v)| v.clone())
                };
                let Some(name) = field("name") else {
                    return bad_request("Missing name");
                };
                if state.logic_files.iter().any(|f| f.name == name) {
                    return RawResponse::json(409, &json!({"msg": "Duplicate record"}));
                }
                state.logic_files.push(StoredLogicFile {
                    name,
                    content: field("content").unwrap_or_default(),
                    main: false,
                });
                ok()
            }
            (Method::Delete, [name]) => {
                let before = state.logic_files.len();
                state.logic_files.retain(|f| f.name != *name);
                if state.logic_files.len() == before {
                    not_found(name)
                } else {
                    ok()
                }
            }
            (Method::Put, [name, "main"]) => {
                if !state.logic_files.iter().any(|f| f.name == *name) {
                    return not_found(name);
                }
                for file in &mut state.logic_files {
                    file.main = file.name == *name;
                }
                ok()
            }
            _ => not_found("route"),
        }
    }
}
