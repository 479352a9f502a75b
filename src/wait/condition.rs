// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Waiting for a status condition on any resource kind.

use super::{poll_until, FetchErrorPolicy, PollSettings, PollStep};
use crate::error::{E2eError, Result};
use crate::kubernetes::ResourceClient;
use crate::types::condition::{conditions_of, find_condition};
use crate::types::{Condition, ResourceRef};
use kube::api::DynamicObject;
use std::fmt;
use tracing::{info, instrument};

/// What a condition must look like to count as satisfied.
///
/// Status is compared exactly, reason exactly when set, and the message by
/// substring. An empty expected message matches any message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionExpectation {
    pub condition_type: String,
    pub status: String,
    pub reason: Option<String>,
    pub message: String,
}

impl ConditionExpectation {
    pub fn new(condition_type: &str, status: &str) -> Self {
        Self {
            condition_type: condition_type.to_string(),
            status: status.to_string(),
            reason: None,
            message: String::new(),
        }
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }

    pub fn matches(&self, condition: &Condition) -> bool {
        condition.condition_type == self.condition_type
            && condition.status == self.status
            && self.reason.as_ref().map_or(true, |r| &condition.reason == r)
            && (self.message.is_empty() || condition.message.contains(&self.message))
    }
}

impl fmt::Display for ConditionExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.condition_type, self.status)?;
        if let Some(reason) = &self.reason {
            write!(f, " reason={}", reason)?;
        }
        if !self.message.is_empty() {
            write!(f, " message~{:?}", self.message)?;
        }
        Ok(())
    }
}

/// What a single tick saw when the condition was not satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    FetchFailed(String),
    NotFound,
    ConditionAbsent,
    Mismatch(Condition),
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observation::FetchFailed(e) => write!(f, "fetch failed: {}", e),
            Observation::NotFound => write!(f, "resource not found"),
            Observation::ConditionAbsent => write!(f, "condition not present"),
            Observation::Mismatch(c) => write!(f, "{}", c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionCheck {
    Satisfied(Condition),
    Pending(Observation),
}

/// Compare the conditions of an already fetched object.
pub fn evaluate(obj: &DynamicObject, expectation: &ConditionExpectation) -> Result<ConditionCheck> {
    let conditions = conditions_of(obj)?;
    Ok(match find_condition(&conditions, &expectation.condition_type) {
        None => ConditionCheck::Pending(Observation::ConditionAbsent),
        Some(c) if expectation.matches(c) => ConditionCheck::Satisfied(c.clone()),
        Some(c) => ConditionCheck::Pending(Observation::Mismatch(c.clone())),
    })
}

/// Fetch the resource once and compare its condition.
///
/// Not-found is always pending. Other fetch errors are pending under
/// [`FetchErrorPolicy::Retry`] and returned under `FailFast`. A malformed
/// condition list is always an error.
pub async fn check_condition(
    resources: &ResourceClient,
    resource: &ResourceRef,
    expectation: &ConditionExpectation,
    fetch_errors: FetchErrorPolicy,
) -> Result<ConditionCheck> {
    let obj = match resources.get(resource).await {
        Ok(obj) => obj,
        Err(e) if e.is_not_found() => return Ok(ConditionCheck::Pending(Observation::NotFound)),
        Err(e) => {
            return match fetch_errors {
                FetchErrorPolicy::Retry => Ok(ConditionCheck::Pending(Observation::FetchFailed(e.to_string()))),
                FetchErrorPolicy::FailFast => Err(e),
            };
        }
    };

    evaluate(&obj, expectation)
}

/// Poll `resource` until its condition matches `expectation`.
#[instrument(skip(resources, expectation, settings), fields(resource = %resource, expect = %expectation))]
pub async fn wait_for_condition(
    resources: &ResourceClient,
    resource: &ResourceRef,
    expectation: &ConditionExpectation,
    settings: &PollSettings,
) -> Result<Condition> {
    let description = format!("{} condition {}", resource, expectation);
    let policy = settings.fetch_errors;

    let result = poll_until(&description, settings, move || async move {
        Ok(match check_condition(resources, resource, expectation, policy).await? {
            ConditionCheck::Satisfied(c) => PollStep::Ready(c),
            ConditionCheck::Pending(observed) => PollStep::Pending(observed.to_string()),
        })
    })
    .await;

    match result {
        Ok(condition) => {
            info!("{}: {} reached", resource, expectation.condition_type);
            Ok(condition)
        }
        Err(E2eError::PollTimeout { observed, elapsed, .. }) => Err(E2eError::ConditionTimeout {
            resource: resource.to_string(),
            condition_type: expectation.condition_type.clone(),
            expected_status: expectation.status.clone(),
            observed,
            elapsed,
        }),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::conditions::{AS_EXPECTED, AVAILABLE, HCP_AVAILABLE_MESSAGE};
    use crate::test_utils::{condition_json, hosted_cluster_json, not_found_json, MockService};
    use crate::types::resource::HOSTED_CLUSTER;
    use serde_json::json;
    use std::time::Duration;

    const HC_PATH: &str = "/apis/hypershift.openshift.io/v1beta1/namespaces/clusters/hostedclusters/demo-cluster";

    fn demo_ref() -> ResourceRef {
        ResourceRef::namespaced(HOSTED_CLUSTER, "clusters", "demo-cluster")
    }

    fn available() -> ConditionExpectation {
        ConditionExpectation::new(AVAILABLE, "True")
            .with_reason(AS_EXPECTED)
            .with_message("available")
    }

    fn fast() -> PollSettings {
        PollSettings::new(Duration::from_millis(5), Duration::from_millis(300))
    }

    fn condition(status: &str, reason: &str, message: &str) -> Condition {
        Condition {
            condition_type: AVAILABLE.to_string(),
            status: status.to_string(),
            reason: reason.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_matches_requires_all_fields() {
        let expect = available();
        assert!(expect.matches(&condition("True", AS_EXPECTED, HCP_AVAILABLE_MESSAGE)));
        assert!(!expect.matches(&condition("False", AS_EXPECTED, HCP_AVAILABLE_MESSAGE)));
        assert!(!expect.matches(&condition("True", "WaitingForEtcd", HCP_AVAILABLE_MESSAGE)));
        assert!(!expect.matches(&condition("True", AS_EXPECTED, "degraded")));
    }

    #[test]
    fn test_empty_message_and_unset_reason_match_anything() {
        let expect = ConditionExpectation::new(AVAILABLE, "True");
        assert!(expect.matches(&condition("True", "Whatever", "")));
        assert!(expect.matches(&condition("True", "", "some text")));
    }

    #[tokio::test]
    async fn test_satisfied_on_first_tick() {
        let body = hosted_cluster_json(
            "demo-cluster",
            "clusters",
            "AWS",
            json!([condition_json(AVAILABLE, "True", AS_EXPECTED, HCP_AVAILABLE_MESSAGE)]),
        );
        let mock = MockService::new().on_get(HC_PATH, 200, &body);
        let recorder = mock.clone();
        let resources = ResourceClient::new(mock.into_client());

        let c = wait_for_condition(&resources, &demo_ref(), &available(), &fast())
            .await
            .unwrap();

        assert_eq!(c.status, "True");
        assert_eq!(recorder.request_count("GET", HC_PATH), 1);
    }

    #[tokio::test]
    async fn test_condition_appears_on_third_tick() {
        let without = hosted_cluster_json("demo-cluster", "clusters", "AWS", json!([]));
        let with = hosted_cluster_json(
            "demo-cluster",
            "clusters",
            "AWS",
            json!([condition_json(AVAILABLE, "True", AS_EXPECTED, HCP_AVAILABLE_MESSAGE)]),
        );
        let mock = MockService::new().on_get_sequence(
            HC_PATH,
            vec![(200, without.clone()), (200, without), (200, with)],
        );
        let recorder = mock.clone();
        let resources = ResourceClient::new(mock.into_client());

        let c = wait_for_condition(&resources, &demo_ref(), &available(), &fast())
            .await
            .unwrap();

        assert_eq!(c.reason, AS_EXPECTED);
        assert_eq!(recorder.request_count("GET", HC_PATH), 3);
    }

    #[tokio::test]
    async fn test_false_throughout_times_out_with_observed_status() {
        let body = hosted_cluster_json(
            "demo-cluster",
            "clusters",
            "AWS",
            json!([condition_json(AVAILABLE, "False", "WaitingForEtcd", "etcd is not ready")]),
        );
        let resources = ResourceClient::new(MockService::new().on_get(HC_PATH, 200, &body).into_client());
        let settings = PollSettings::new(Duration::from_millis(5), Duration::from_millis(40));

        let err = wait_for_condition(&resources, &demo_ref(), &available(), &settings)
            .await
            .unwrap_err();

        match &err {
            E2eError::ConditionTimeout {
                resource,
                condition_type,
                expected_status,
                observed,
                elapsed,
            } => {
                assert_eq!(resource, "HostedCluster clusters/demo-cluster");
                assert_eq!(condition_type, AVAILABLE);
                assert_eq!(expected_status, "True");
                assert!(observed.contains("status=False"));
                assert!(*elapsed >= settings.timeout, "gave up after {:?}", elapsed);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_not_found_is_retried() {
        let with = hosted_cluster_json(
            "demo-cluster",
            "clusters",
            "AWS",
            json!([condition_json(AVAILABLE, "True", AS_EXPECTED, HCP_AVAILABLE_MESSAGE)]),
        );
        let mock = MockService::new().on_get_sequence(
            HC_PATH,
            vec![(404, not_found_json("hostedclusters", "demo-cluster")), (200, with)],
        );
        let resources = ResourceClient::new(mock.into_client());

        assert!(wait_for_condition(&resources, &demo_ref(), &available(), &fast())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_fetch_error_policy() {
        let forbidden = json!({
            "kind": "Status", "apiVersion": "v1", "status": "Failure",
            "message": "forbidden", "reason": "Forbidden", "code": 403
        })
        .to_string();
        let resources = ResourceClient::new(MockService::new().on_get(HC_PATH, 403, &forbidden).into_client());

        let retried = check_condition(&resources, &demo_ref(), &available(), FetchErrorPolicy::Retry)
            .await
            .unwrap();
        assert!(matches!(retried, ConditionCheck::Pending(Observation::FetchFailed(_))));

        let failed = check_condition(&resources, &demo_ref(), &available(), FetchErrorPolicy::FailFast).await;
        assert!(failed.is_err());
    }

    #[tokio::test]
    async fn test_malformed_conditions_abort_immediately() {
        let body = json!({
            "apiVersion": "hypershift.openshift.io/v1beta1",
            "kind": "HostedCluster",
            "metadata": {"name": "demo-cluster", "namespace": "clusters"},
            "status": {"conditions": {"type": "Available"}}
        })
        .to_string();
        let mock = MockService::new().on_get(HC_PATH, 200, &body);
        let recorder = mock.clone();
        let resources = ResourceClient::new(mock.into_client());

        let err = wait_for_condition(&resources, &demo_ref(), &available(), &fast())
            .await
            .unwrap_err();

        assert!(matches!(err, E2eError::MalformedResource { .. }));
        assert_eq!(recorder.request_count("GET", HC_PATH), 1);
    }
}
