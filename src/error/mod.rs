//! Error types and handling for vcl-deploy
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`api`]: Credential pool and remote service errors
//! - [`config`]: Run configuration errors
//! - [`deploy`]: Deployment lifecycle errors
//! - [`fs`]: File system errors

pub mod api;
pub mod config;
pub mod deploy;
pub mod fs;

#[cfg(test)]
mod tests;

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for vcl-deploy operations
#[derive(Error, Diagnostic, Debug)]
pub enum DeployError {
    // Credential and API errors
    #[error("No API keys left to authenticate with")]
    #[diagnostic(
        code(vcl_deploy::api::exhausted),
        help("Pass additional keys with --api-keys or set FASTLY_APIKEY")
    )]
    CredentialsExhausted,

    #[error("{method} {path} failed before a response was received: {reason}")]
    #[diagnostic(code(vcl_deploy::api::transport))]
    Transport {
        method: String,
        path: String,
        reason: String,
    },

    #[error("{method} {path} hit the rate limit and no backup API keys are available")]
    #[diagnostic(
        code(vcl_deploy::api::rate_limited),
        help("Wait for the hourly limit to reset or pass more keys with --api-keys")
    )]
    RateLimited {
        method: String,
        path: String,
        body: String,
    },

    #[error("{method} {path} was rejected with status {status}: {body}")]
    #[diagnostic(code(vcl_deploy::api::rejected))]
    Api {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response of {method} {path}: {reason}")]
    #[diagnostic(code(vcl_deploy::api::decode))]
    Decode {
        method: String,
        path: String,
        reason: String,
    },

    // Local bundle errors
    #[error("Environment variable {name} is required to deploy this vcl")]
    #[diagnostic(
        code(vcl_deploy::bundle::missing_variable),
        help("Export the variable or add it to .env and pass --env")
    )]
    MissingVariable { name: String },

    // Lifecycle errors
    #[error("Service '{service_id}' not found")]
    #[diagnostic(
        code(vcl_deploy::deploy::service_not_found),
        help("Check the service id and that the API key has access to it")
    )]
    ServiceNotFound { service_id: String },

    #[error("Entry point '{name}' is not one of the uploaded vcl files ({available})")]
    #[diagnostic(
        code(vcl_deploy::deploy::entry_point_not_found),
        help("Set --main to the file name of one of the uploaded .vcl files")
    )]
    EntryPointNotFound { name: String, available: String },

    #[error("VCL validation failed for version {version}: {message}")]
    #[diagnostic(
        code(vcl_deploy::deploy::validation),
        help("The draft version was left inactive and can be inspected in the dashboard")
    )]
    Validation { version: u32, message: String },

    #[error("Failed to activate version {version}: {reason}")]
    #[diagnostic(code(vcl_deploy::deploy::activation))]
    Activation { version: u32, reason: String },

    #[error("Failed to reconcile {kind}: {count} operation(s) failed", count = .failures.len())]
    #[diagnostic(code(vcl_deploy::deploy::reconcile_failed))]
    ReconcileFailed {
        kind: String,
        #[related]
        failures: Vec<DeployError>,
    },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(vcl_deploy::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(vcl_deploy::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(vcl_deploy::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(vcl_deploy::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Desired-state bundle not found: {path}")]
    #[diagnostic(
        code(vcl_deploy::config::bundle_not_found),
        help("--backends takes the path of a JSON or YAML file")
    )]
    BundleNotFound { path: String },

    #[error("Failed to parse desired-state bundle: {path}: {reason}")]
    #[diagnostic(code(vcl_deploy::config::bundle_parse_failed))]
    BundleParseFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read {path}: {reason}")]
    #[diagnostic(code(vcl_deploy::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(vcl_deploy::fs::io_error))]
    IoError { message: String },

    // Interaction errors
    #[error("Failed to read confirmation: {message}")]
    #[diagnostic(code(vcl_deploy::ui::prompt_failed))]
    PromptFailed { message: String },
}

/// Coarse classification of a [`DeployError`], used to label the failed stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Exhausted,
    TransportError,
    RateLimited,
    ApiError,
    DecodeError,
    MissingVariable,
    ServiceNotFound,
    EntryPointNotFound,
    ValidationError,
    ActivationError,
    ReconcileFailed,
    Config,
    Io,
    Prompt,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Exhausted => "credentials exhausted",
            Self::TransportError => "transport error",
            Self::RateLimited => "rate limited",
            Self::ApiError => "api error",
            Self::DecodeError => "decode error",
            Self::MissingVariable => "missing variable",
            Self::ServiceNotFound => "service not found",
            Self::EntryPointNotFound => "entry point not found",
            Self::ValidationError => "validation error",
            Self::ActivationError => "activation error",
            Self::ReconcileFailed => "reconcile failed",
            Self::Config => "configuration error",
            Self::Io => "io error",
            Self::Prompt => "prompt error",
        };
        f.write_str(label)
    }
}

impl DeployError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CredentialsExhausted => ErrorKind::Exhausted,
            Self::Transport { .. } => ErrorKind::TransportError,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Api { .. } => ErrorKind::ApiError,
            Self::Decode { .. } => ErrorKind::DecodeError,
            Self::MissingVariable { .. } => ErrorKind::MissingVariable,
            Self::ServiceNotFound { .. } => ErrorKind::ServiceNotFound,
            Self::EntryPointNotFound { .. } => ErrorKind::EntryPointNotFound,
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::Activation { .. } => ErrorKind::ActivationError,
            Self::ReconcileFailed { .. } => ErrorKind::ReconcileFailed,
            Self::ConfigNotFound { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigReadFailed { .. }
            | Self::ConfigInvalid { .. }
            | Self::BundleNotFound { .. }
            | Self::BundleParseFailed { .. } => ErrorKind::Config,
            Self::FileReadFailed { .. } | Self::IoError { .. } => ErrorKind::Io,
            Self::PromptFailed { .. } => ErrorKind::Prompt,
        }
    }

    /// HTTP status of a rejected request, if this error came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DeployError {
    fn from(err: std::io::Error) -> Self {
        DeployError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for DeployError {
    fn from(err: serde_yaml::Error) -> Self {
        DeployError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DeployError {
    fn from(err: serde_json::Error) -> Self {
        DeployError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for DeployError {
    fn from(err: inquire::InquireError) -> Self {
        DeployError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, DeployError>;
