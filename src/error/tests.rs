//! Error type tests
//!
//! Tests for DeployError and its conversions.

#![allow(clippy::expect_used)]

use crate::error::{DeployError, ErrorKind, api, config, deploy, fs};
use miette::Diagnostic;

macro_rules! test_error_contains {
    ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
        #[test]
        fn $test_name() {
            let err = $err;
            let error_string = err.to_string();
            $(
                assert!(error_string.contains($contains),
                    "Error message should contain '{}', got: {}",
                    $contains,
                    error_string
                );
            )+
        }
    };
}

#[test]
fn test_error_display() {
    let err = deploy::service_not_found("SU1Z0isxPaozGVKXdv0eY");
    assert_eq!(
        err.to_string(),
        "Service 'SU1Z0isxPaozGVKXdv0eY' not found"
    );
}

#[test]
fn test_error_code() {
    let err = api::exhausted();
    assert_eq!(
        err.code()
            .map(|c: Box<dyn std::fmt::Display>| c.to_string()),
        Some("vcl_deploy::api::exhausted".to_string())
    );
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: DeployError = io_err.into();
    assert!(matches!(err, DeployError::IoError { .. }));
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_yaml_error_conversion() {
    let parse_result: std::result::Result<serde_yaml::Value, _> =
        serde_yaml::from_str("invalid: yaml: content: [unclosed");
    let yaml_err = parse_result.expect_err("YAML parsing should have failed");
    let err: DeployError = yaml_err.into();
    assert!(matches!(err, DeployError::ConfigParseFailed { .. }));
}

#[test]
fn test_json_error_conversion() {
    let parse_result: std::result::Result<serde_json::Value, _> =
        serde_json::from_str("invalid json content");
    let json_err = parse_result.expect_err("JSON parsing should have failed");
    let err: DeployError = json_err.into();
    assert!(matches!(err, DeployError::ConfigParseFailed { .. }));
}

test_error_contains!(
    test_transport_error,
    api::transport("GET", "/service", "connection refused"),
    "GET /service",
    "connection refused"
);

test_error_contains!(
    test_rate_limited_error,
    api::rate_limited("POST", "/service/abc/version/4/backend", "{}"),
    "rate limit",
    "/service/abc/version/4/backend"
);

test_error_contains!(
    test_missing_variable_error,
    deploy::missing_variable("ORIGIN_HOST"),
    "ORIGIN_HOST",
    "required"
);

test_error_contains!(
    test_entry_point_error_lists_available,
    deploy::entry_point_not_found("c", &["a".to_string(), "b".to_string()]),
    "'c'",
    "a, b"
);

test_error_contains!(
    test_entry_point_error_without_files,
    deploy::entry_point_not_found("main", &[]),
    "none"
);

test_error_contains!(
    test_config_invalid_error,
    config::invalid("the service parameter is required"),
    "Invalid configuration",
    "service parameter"
);

test_error_contains!(
    test_file_read_failed_error,
    fs::read_failed("/path/to/backends.json", "permission denied"),
    "/path/to/backends.json",
    "permission denied"
);

#[test]
fn test_validation_error_keeps_message() {
    let err = deploy::validation(4, "syntax error line 5");
    match &err {
        DeployError::Validation { version, message } => {
            assert_eq!(*version, 4);
            assert_eq!(message, "syntax error line 5");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::ValidationError);
}

#[test]
fn test_rejected_error_exposes_status() {
    let err = api::rejected("DELETE", "/service/abc/version/4/backend/old1", 404, "{}");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.kind(), ErrorKind::ApiError);
    assert_eq!(api::exhausted().status(), None);
}

#[test]
fn test_reconcile_failed_relates_each_failure() {
    let err = deploy::reconcile_failed(
        "backends",
        vec![
            api::rejected("POST", "/a", 400, "bad"),
            api::rejected("POST", "/b", 409, "duplicate"),
        ],
    );
    assert!(err.to_string().contains("2 operation(s) failed"));
    let related = err.related().map(Iterator::count);
    assert_eq!(related, Some(2));
    assert_eq!(err.kind(), ErrorKind::ReconcileFailed);
}

test_error_contains!(
    test_missing_service_error,
    config::missing_service("FASTLY_SERVICE_ID"),
    "service parameter is required",
    "--service",
    "FASTLY_SERVICE_ID"
);

test_error_contains!(
    test_missing_api_keys_error,
    config::missing_api_keys("FASTLY_APIKEY"),
    "API key not found",
    "FASTLY_APIKEY"
);

test_error_contains!(
    test_duplicate_logic_file_error,
    config::duplicate_logic_file("main", "a/main.vcl", "b/main.vcl"),
    "'main'",
    "a/main.vcl",
    "b/main.vcl"
);

test_error_contains!(
    test_bundle_not_found_error,
    config::bundle_not_found("backends.yaml"),
    "Desired-state bundle not found",
    "backends.yaml"
);

#[test]
fn test_config_constructors_classify_as_config() {
    for err in [
        config::not_found("vcl-deploy.yaml"),
        config::parse_failed("vcl-deploy.yaml", "bad"),
        config::read_failed("vcl-deploy.yaml", "denied"),
        config::invalid("nope"),
        config::missing_service("FASTLY_SERVICE_ID"),
        config::missing_api_keys("FASTLY_APIKEY"),
        config::missing_folders(),
        config::unknown_kind("widgets"),
        config::invalid_skip("backends", "expected KIND=NAME"),
        config::bundle_not_found("backends.yaml"),
        config::bundle_parse_failed("backends.yaml", "bad"),
    ] {
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}

#[test]
fn test_error_kind_display() {
    assert_eq!(ErrorKind::ValidationError.to_string(), "validation error");
    assert_eq!(ErrorKind::Exhausted.to_string(), "credentials exhausted");
}
