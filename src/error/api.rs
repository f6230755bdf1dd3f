//! Credential pool and remote service errors

use std::fmt::Display;

use super::DeployError;

/// Creates a credentials exhausted error
pub fn exhausted() -> DeployError {
    DeployError::CredentialsExhausted
}

/// Creates a transport error for a request that got no response
pub fn transport(
    method: impl Display,
    path: impl Into<String>,
    reason: impl Into<String>,
) -> DeployError {
    DeployError::Transport {
        method: method.to_string(),
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a rate limited error
pub fn rate_limited(
    method: impl Display,
    path: impl Into<String>,
    body: impl Into<String>,
) -> DeployError {
    DeployError::RateLimited {
        method: method.to_string(),
        path: path.into(),
        body: body.into(),
    }
}

/// Creates an error for a request the service rejected
pub fn rejected(
    method: impl Display,
    path: impl Into<String>,
    status: u16,
    body: impl Into<String>,
) -> DeployError {
    DeployError::Api {
        method: method.to_string(),
        path: path.into(),
        status,
        body: body.into(),
    }
}

/// Creates a response decode error
pub fn decode(
    method: impl Display,
    path: impl Into<String>,
    reason: impl Into<String>,
) -> DeployError {
    DeployError::Decode {
        method: method.to_string(),
        path: path.into(),
        reason: reason.into(),
    }
}
