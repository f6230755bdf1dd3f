//! Wire boundary of the remote configuration service
//!
//! Requests are described by [`ApiRequest`] (method, unencoded path segments,
//! optional form body) and answered with a [`RawResponse`]. Classification of
//! the response happens in the client, so any [`Transport`] only has to move
//! bytes.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use super::Credential;
use crate::error::{Result, api, config};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.fastly.com";

/// Header carrying the API key
pub const AUTH_HEADER: &str = "Fastly-Key";

pub const USER_AGENT: &str = concat!("vcl-deploy/", env!("CARGO_PKG_VERSION"));

/// HTTP method of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// A request to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path segments, percent-encoded by the transport
    pub segments: Vec<String>,
    /// Form-encoded body for mutations
    pub form: Option<Vec<(String, String)>>,
}

impl ApiRequest {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            form: None,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Get, segments)
    }

    pub fn post<I, S>(segments: I, form: Vec<(String, String)>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Post, segments).with_form(form)
    }

    pub fn put<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Put, segments)
    }

    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::Delete, segments)
    }

    #[must_use]
    pub fn with_form(mut self, form: Vec<(String, String)>) -> Self {
        self.form = Some(form);
        self
    }

    /// Human-readable path, used in logs and errors
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Unclassified response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// JSON response with the given status
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, Some("application/json"), body.to_string())
    }
}

/// Moves one authenticated request to the service and back
///
/// Implementations return `DeployError::Transport` when no response was
/// received at all; every HTTP status, including errors, is a `RawResponse`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest, credential: &Credential) -> Result<RawResponse>;
}

/// `reqwest` transport over rustls with TLS 1.2 as the minimum protocol
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Result<Self> {
        let base_url = Url::parse(endpoint)
            .map_err(|e| config::invalid(format!("Invalid API endpoint '{endpoint}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(config::invalid(format!(
                "Invalid API endpoint '{endpoint}': not a base URL"
            )));
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| config::invalid(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn url_for(&self, request: &ApiRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(&request.segments);
        }
        url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest, credential: &Credential) -> Result<RawResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, self.url_for(request))
            .header(AUTH_HEADER, credential.expose())
            .header(ACCEPT, "application/json");
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| api::transport(request.method, request.path(), e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| api::transport(request.method, request.path(), e.to_string()))?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
