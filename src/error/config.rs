//! Run configuration errors
//!
//! Covers the configuration file, the resolved deploy settings, and the
//! desired-state bundle a run points at.

use super::DeployError;

/// An explicitly named configuration file does not exist
pub fn not_found(path: impl Into<String>) -> DeployError {
    DeployError::ConfigNotFound { path: path.into() }
}

pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> DeployError {
    DeployError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> DeployError {
    DeployError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Catch-all for settings that resolve to something unusable
pub fn invalid(message: impl Into<String>) -> DeployError {
    DeployError::ConfigInvalid {
        message: message.into(),
    }
}

/// No service from the flag, `env_var`, or the configuration file
pub fn missing_service(env_var: &str) -> DeployError {
    invalid(format!(
        "the service parameter is required; pass --service, set {env_var}, or add \
         `service` to the configuration file. The value is the service id or the \
         name of an environment variable holding it"
    ))
}

/// The key pool would start out empty
pub fn missing_api_keys(env_var: &str) -> DeployError {
    invalid(format!(
        "API key not found. Either set a {env_var} environment variable, \
         or pass in using the --api-keys option"
    ))
}

pub fn missing_folders() -> DeployError {
    invalid("Please provide a folder(s) where the .vcl is located")
}

/// A skip rule names a kind the bundle format does not have
pub fn unknown_kind(key: &str) -> DeployError {
    invalid(format!("Unknown resource kind '{key}'"))
}

pub fn invalid_skip(entry: &str, reason: &str) -> DeployError {
    invalid(format!("Invalid skip '{entry}': {reason}"))
}

/// Two folders contribute a `.vcl` file with the same name
pub fn duplicate_logic_file(name: &str, first: &str, second: &str) -> DeployError {
    invalid(format!(
        "vcl file '{name}' is found in more than one folder: {first} and {second}"
    ))
}

/// The `--backends` path does not point at a file
pub fn bundle_not_found(path: impl Into<String>) -> DeployError {
    DeployError::BundleNotFound { path: path.into() }
}

pub fn bundle_parse_failed(path: impl Into<String>, reason: impl Into<String>) -> DeployError {
    DeployError::BundleParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
