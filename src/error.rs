// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to build Kubernetes client: {0}")]
    KubeconfigError(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Malformed {resource}: {reason}")]
    MalformedResource { resource: String, reason: String },

    #[error(
        "Timed out after {elapsed:?} waiting for {resource} condition {condition_type} to be \
         status={expected_status}; last observed: {observed}"
    )]
    ConditionTimeout {
        resource: String,
        condition_type: String,
        expected_status: String,
        observed: String,
        elapsed: Duration,
    },

    #[error("Timed out after {elapsed:?} waiting for {resource} to be {expected}")]
    ExistenceTimeout {
        resource: String,
        expected: String,
        elapsed: Duration,
    },

    #[error("Timed out after {elapsed:?} waiting for {description}; last observed: {observed}")]
    PollTimeout {
        description: String,
        observed: String,
        elapsed: Duration,
    },

    #[error("Failed to spawn {command}: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with code {code:?}:\n{output}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("{command} did not finish within {timeout:?}")]
    CommandTimeout { command: String, timeout: Duration },

    #[error("Missing setting: {0}")]
    MissingSetting(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Metrics query failed: {0}")]
    MetricsError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),
}

impl E2eError {
    /// Whether the error is a Kubernetes 404, either from the API or from a
    /// lookup that found nothing.
    pub fn is_not_found(&self) -> bool {
        match self {
            E2eError::KubeError(kube::Error::Api(err)) => err.code == 404,
            E2eError::NotFound(_) => true,
            _ => false,
        }
    }

    /// Whether the error is a Kubernetes 409 AlreadyExists.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, E2eError::KubeError(kube::Error::Api(err)) if err.code == 409)
    }
}

pub type Result<T> = std::result::Result<T, E2eError>;

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16) -> E2eError {
        E2eError::KubeError(kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "boom".to_string(),
            reason: "Whatever".to_string(),
            code,
        }))
    }

    #[test]
    fn test_is_not_found() {
        assert!(api_error(404).is_not_found());
        assert!(E2eError::NotFound("HostedCluster x".to_string()).is_not_found());
        assert!(!api_error(403).is_not_found());
    }

    #[test]
    fn test_is_already_exists() {
        assert!(api_error(409).is_already_exists());
        assert!(!api_error(404).is_already_exists());
    }

    #[test]
    fn test_condition_timeout_message_names_everything() {
        let err = E2eError::ConditionTimeout {
            resource: "HostedCluster clusters/demo-cluster".to_string(),
            condition_type: "Available".to_string(),
            expected_status: "True".to_string(),
            observed: "status=False".to_string(),
            elapsed: Duration::from_secs(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("HostedCluster clusters/demo-cluster"));
        assert!(msg.contains("Available"));
        assert!(msg.contains("status=True"));
        assert!(msg.contains("status=False"));
    }
}
