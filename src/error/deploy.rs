//! Deployment lifecycle errors

use super::DeployError;

/// Creates a missing variable error
pub fn missing_variable(name: impl Into<String>) -> DeployError {
    DeployError::MissingVariable { name: name.into() }
}

/// Creates a service not found error
pub fn service_not_found(service_id: impl Into<String>) -> DeployError {
    DeployError::ServiceNotFound {
        service_id: service_id.into(),
    }
}

/// Creates an entry point not found error
pub fn entry_point_not_found(name: impl Into<String>, available: &[String]) -> DeployError {
    let available = if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    };
    DeployError::EntryPointNotFound {
        name: name.into(),
        available,
    }
}

/// Creates a validation error carrying the message reported by the service
pub fn validation(version: u32, message: impl Into<String>) -> DeployError {
    DeployError::Validation {
        version,
        message: message.into(),
    }
}

/// Creates an activation error
pub fn activation(version: u32, reason: impl Into<String>) -> DeployError {
    DeployError::Activation {
        version,
        reason: reason.into(),
    }
}

/// Creates an aggregate error for one resource kind
pub fn reconcile_failed(kind: impl Into<String>, failures: Vec<DeployError>) -> DeployError {
    DeployError::ReconcileFailed {
        kind: kind.into(),
        failures,
    }
}
