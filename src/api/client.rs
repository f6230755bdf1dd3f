//! Authenticated API client
//!
//! Every call goes through [`ApiClient::call`], which picks the current
//! credential, sends the request, and classifies the response:
//!
//! - rate limited: rotate to the next key and retry, or fail with `RateLimited`
//! - any other status >= 400: `Api` error carrying status and body
//! - status < 303 with a JSON content type: parsed JSON, or `Decode` on failure
//! - anything else: the raw text
//!
//! Calls may run concurrently. The pool is shared behind an async mutex and
//! rotation is keyed on the pool generation, so two calls that hit the limit
//! with the same key discard it only once.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{ApiRequest, CredentialPool, RawResponse, Transport};
use crate::error::{Result, api};
use crate::ui::{CallEvent, CallOutcome, Reporter};

/// Body text the service uses when the hourly limit is exceeded
pub const RATE_LIMIT_MARKER: &str = "You have exceeded your hourly rate limit";

const TOO_MANY_REQUESTS: u16 = 429;

/// Classified response of a successful call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    Text(String),
}

impl ApiResponse {
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

/// Client over a [`Transport`] and a shared [`CredentialPool`]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    pool: Mutex<CredentialPool>,
    reporter: Arc<dyn Reporter>,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        pool: CredentialPool,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            transport,
            pool: Mutex::new(pool),
            reporter,
        }
    }

    pub fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }

    /// Number of credentials still in the pool
    pub async fn remaining_credentials(&self) -> usize {
        self.pool.lock().await.len()
    }

    /// Send a request, failing over to backup keys on rate limits
    pub async fn call(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let path = request.path();
        loop {
            let (generation, credential) = {
                let pool = self.pool.lock().await;
                if pool.is_spent() {
                    return Err(api::rate_limited(
                        request.method,
                        path,
                        "every API key has hit the rate limit",
                    ));
                }
                pool.checkout()?
            };

            let raw = match self.transport.send(request, &credential).await {
                Ok(raw) => raw,
                Err(e) => {
                    self.report(request, &path, CallOutcome::Failed { status: None });
                    return Err(e);
                }
            };

            if raw.status >= 400 {
                if is_rate_limited(&raw) {
                    let retrying = self.rotate_after_limit(generation).await?;
                    self.report(request, &path, CallOutcome::RateLimited { retrying });
                    if retrying {
                        continue;
                    }
                    return Err(api::rate_limited(request.method, path, raw.body));
                }
                self.report(
                    request,
                    &path,
                    CallOutcome::Failed {
                        status: Some(raw.status),
                    },
                );
                return Err(api::rejected(request.method, path, raw.status, raw.body));
            }

            return match classify(request, &path, raw) {
                Ok((status, response)) => {
                    self.report(request, &path, CallOutcome::Succeeded { status });
                    Ok(response)
                }
                Err((status, e)) => {
                    self.report(
                        request,
                        &path,
                        CallOutcome::Failed {
                            status: Some(status),
                        },
                    );
                    Err(e)
                }
            };
        }
    }

    /// Send a request and deserialize its JSON response
    pub async fn call_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        match self.call(request).await? {
            ApiResponse::Json(value) => serde_json::from_value(value)
                .map_err(|e| api::decode(request.method, request.path(), e.to_string())),
            ApiResponse::Text(_) => Err(api::decode(
                request.method,
                request.path(),
                "expected a JSON response",
            )),
        }
    }

    /// Returns whether the caller should retry.
    ///
    /// If another call already rotated away from the credential we used, the
    /// retry uses the new head without discarding it.
    async fn rotate_after_limit(&self, generation: u64) -> Result<bool> {
        let mut pool = self.pool.lock().await;
        if pool.is_spent() {
            return Ok(false);
        }
        if pool.generation() != generation {
            return Ok(true);
        }
        if pool.has_backup() {
            pool.rotate()?;
            return Ok(true);
        }
        pool.retire_limited();
        Ok(false)
    }

    fn report(&self, request: &ApiRequest, path: &str, outcome: CallOutcome) {
        self.reporter.call(&CallEvent {
            method: request.method,
            path: path.to_string(),
            outcome,
        });
    }
}

fn is_rate_limited(raw: &RawResponse) -> bool {
    raw.status == TOO_MANY_REQUESTS || raw.body.contains(RATE_LIMIT_MARKER)
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

fn classify(
    request: &ApiRequest,
    path: &str,
    raw: RawResponse,
) -> std::result::Result<(u16, ApiResponse), (u16, crate::DeployError)> {
    let status = raw.status;
    if status < 303 && is_json(raw.content_type.as_deref()) {
        return serde_json::from_str(&raw.body)
            .map(|value| (status, ApiResponse::Json(value)))
            .map_err(|e| (status, api::decode(request.method, path, e.to_string())));
    }
    Ok((status, ApiResponse::Text(raw.body)))
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::api::Credential;
    use crate::error::{DeployError, ErrorKind};
    use crate::ui::RecordingReporter;

    /// Replays canned responses and records the key each attempt used
    #[derive(Default)]
    struct ScriptedTransport {
        responses: StdMutex<VecDeque<RawResponse>>,
        seen_keys: StdMutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<RawResponse>) -> Self {
            Self {
                responses: StdMutex::new(responses.into()),
                seen_keys: StdMutex::default(),
            }
        }

        fn keys(&self) -> Vec<String> {
            self.seen_keys.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: &ApiRequest, credential: &Credential) -> Result<RawResponse> {
            self.seen_keys
                .lock()
                .unwrap()
                .push(credential.expose().to_string());
            tokio::task::yield_now().await;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| api::transport(request.method, request.path(), "connection reset"))
        }
    }

    fn limited() -> RawResponse {
        RawResponse::new(429, Some("text/plain"), RATE_LIMIT_MARKER)
    }

    fn client(
        responses: Vec<RawResponse>,
        keys: &[&str],
    ) -> (ApiClient, Arc<ScriptedTransport>, Arc<RecordingReporter>) {
        let transport = Arc::new(ScriptedTransport::new(responses));
        let reporter = Arc::new(RecordingReporter::new());
        let client = ApiClient::new(
            transport.clone(),
            CredentialPool::from_keys(keys),
            reporter.clone(),
        );
        (client, transport, reporter)
    }

    #[tokio::test]
    async fn test_json_response_is_parsed() {
        let (client, _, reporter) = client(
            vec![RawResponse::new(
                200,
                Some("application/json; charset=utf-8"),
                r#"[{"id":"abc"}]"#,
            )],
            &["k1"],
        );
        let response = client.call(&ApiRequest::get(["service"])).await.unwrap();
        assert_eq!(response, ApiResponse::Json(json!([{"id": "abc"}])));
        assert_eq!(
            reporter.calls()[0].outcome,
            CallOutcome::Succeeded { status: 200 }
        );
    }

    #[tokio::test]
    async fn test_non_json_response_is_text() {
        let (client, _, _) = client(
            vec![RawResponse::new(200, Some("text/html"), "<p>ok</p>")],
            &["k1"],
        );
        let response = client.call(&ApiRequest::get(["service"])).await.unwrap();
        assert_eq!(response, ApiResponse::Text("<p>ok</p>".to_string()));
    }

    #[tokio::test]
    async fn test_redirect_is_not_parsed() {
        let (client, _, _) = client(
            vec![RawResponse::new(304, Some("application/json"), "")],
            &["k1"],
        );
        let response = client.call(&ApiRequest::get(["service"])).await.unwrap();
        assert_eq!(response, ApiResponse::Text(String::new()));
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let (client, _, reporter) = client(
            vec![RawResponse::new(200, Some("application/json"), "{not json")],
            &["k1"],
        );
        let err = client.call(&ApiRequest::get(["service"])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
        assert_eq!(
            reporter.calls()[0].outcome,
            CallOutcome::Failed { status: Some(200) }
        );
    }

    #[tokio::test]
    async fn test_rejection_carries_status_and_body() {
        let (client, _, _) = client(
            vec![RawResponse::new(
                409,
                Some("application/json"),
                r#"{"msg":"Duplicate record"}"#,
            )],
            &["k1", "k2"],
        );
        let err = client
            .call(&ApiRequest::post(["service", "x", "version", "2", "backend"], vec![]))
            .await
            .unwrap_err();
        match err {
            DeployError::Api { status, body, .. } => {
                assert_eq!(status, 409);
                assert!(body.contains("Duplicate record"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(client.remaining_credentials().await, 2);
    }

    #[tokio::test]
    async fn test_rate_limit_rotates_to_backup() {
        let (client, transport, reporter) = client(
            vec![
                limited(),
                RawResponse::json(200, &json!({"number": 4})),
            ],
            &["k1", "k2"],
        );
        let response = client.call(&ApiRequest::put(["clone"])).await.unwrap();
        assert_eq!(response.into_json(), Some(json!({"number": 4})));
        assert_eq!(transport.keys(), vec!["k1", "k2"]);
        assert_eq!(client.remaining_credentials().await, 1);
        assert_eq!(
            reporter.calls()[0].outcome,
            CallOutcome::RateLimited { retrying: true }
        );
    }

    #[tokio::test]
    async fn test_all_keys_limited_makes_one_attempt_per_key() {
        let (client, transport, reporter) =
            client(vec![limited(), limited(), limited()], &["k1", "k2", "k3"]);
        let err = client.call(&ApiRequest::get(["service"])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(transport.keys(), vec!["k1", "k2", "k3"]);
        assert_eq!(
            reporter.calls().last().unwrap().outcome,
            CallOutcome::RateLimited { retrying: false }
        );
        assert_eq!(client.remaining_credentials().await, 0);
    }

    #[tokio::test]
    async fn test_limited_pool_fails_later_calls_without_sending() {
        let (client, transport, reporter) =
            client(vec![limited(), RawResponse::json(200, &json!([]))], &["k1"]);

        let first = client.call(&ApiRequest::get(["service"])).await.unwrap_err();
        assert_eq!(first.kind(), ErrorKind::RateLimited);

        let second = client.call(&ApiRequest::get(["service"])).await.unwrap_err();
        assert_eq!(second.kind(), ErrorKind::RateLimited);
        assert_eq!(transport.keys(), vec!["k1"]);
        assert_eq!(reporter.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_calls_stop_once_pool_is_limited() {
        let (client, transport, _) = client(vec![limited(), limited()], &["k1"]);

        let req_a = ApiRequest::get(["service"]);
        let req_b = ApiRequest::get(["service"]);
        let (a, b) = tokio::join!(client.call(&req_a), client.call(&req_b));
        assert_eq!(a.unwrap_err().kind(), ErrorKind::RateLimited);
        assert_eq!(b.unwrap_err().kind(), ErrorKind::RateLimited);
        // Both may have been in flight on k1, but nothing goes out afterwards
        assert!(transport.keys().len() <= 2);
        assert!(transport.keys().iter().all(|k| k == "k1"));
        assert_eq!(client.remaining_credentials().await, 0);
    }

    #[tokio::test]
    async fn test_marker_body_counts_as_rate_limit() {
        let (client, transport, _) = client(
            vec![
                RawResponse::new(
                    403,
                    Some("application/json"),
                    format!(r#"{{"msg":"{RATE_LIMIT_MARKER}"}}"#),
                ),
                RawResponse::json(200, &json!([])),
            ],
            &["k1", "k2"],
        );
        client.call(&ApiRequest::get(["service"])).await.unwrap();
        assert_eq!(transport.keys(), vec!["k1", "k2"]);
    }

    #[tokio::test]
    async fn test_empty_pool_is_exhausted() {
        let (client, transport, _) = client(vec![], &[]);
        let err = client.call(&ApiRequest::get(["service"])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Exhausted);
        assert!(transport.keys().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_is_reported() {
        let (client, _, reporter) = client(vec![], &["k1"]);
        let err = client.call(&ApiRequest::get(["service"])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransportError);
        assert_eq!(
            reporter.calls()[0].outcome,
            CallOutcome::Failed { status: None }
        );
    }

    #[tokio::test]
    async fn test_call_json_rejects_text() {
        let (client, _, _) = client(vec![RawResponse::new(200, None, "ok")], &["k1"]);
        let result: Result<Vec<Value>> = client.call_json(&ApiRequest::get(["service"])).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::DecodeError);
    }

    #[tokio::test]
    async fn test_concurrent_limits_rotate_once() {
        let (client, transport, _) = client(
            vec![
                limited(),
                limited(),
                RawResponse::json(200, &json!([])),
                RawResponse::json(200, &json!([])),
            ],
            &["k1", "k2", "k3"],
        );
        let request = ApiRequest::get(["service"]);
        let (a, b) = tokio::join!(client.call(&request), client.call(&request));
        assert!(a.is_ok() && b.is_ok());
        // Both calls hit the limit on k1 but only k1 is discarded
        assert_eq!(client.remaining_credentials().await, 2);
        assert_eq!(transport.keys(), vec!["k1", "k1", "k2", "k2"]);
    }
}
