// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace inspection utilities

use crate::error::{E2eError, Result};
use k8s_openapi::api::core::v1::Namespace;
use kube::{Api, Client, ResourceExt};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Labels of a namespace. A missing namespace is [`E2eError::NotFound`].
#[instrument(skip(client))]
pub async fn namespace_labels(client: &Client, namespace: &str) -> Result<BTreeMap<String, String>> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.get_opt(namespace).await? {
        Some(ns) => {
            debug!("Namespace {} labels: {:?}", namespace, ns.labels());
            Ok(ns.labels().clone())
        }
        None => Err(E2eError::NotFound(format!("Namespace {}", namespace))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{not_found_json, MockService};
    use serde_json::json;

    #[tokio::test]
    async fn test_namespace_labels() {
        let ns = json!({
            "apiVersion": "v1",
            "kind": "Namespace",
            "metadata": {"name": "hypershift", "labels": {"openshift.io/cluster-monitoring": "true"}}
        })
        .to_string();
        let client = MockService::new()
            .on_get("/api/v1/namespaces/hypershift", 200, &ns)
            .into_client();

        let labels = namespace_labels(&client, "hypershift").await.unwrap();
        assert_eq!(
            labels.get("openshift.io/cluster-monitoring").map(String::as_str),
            Some("true")
        );
    }

    #[tokio::test]
    async fn test_missing_namespace() {
        let client = MockService::new()
            .on_get("/api/v1/namespaces/hypershift", 404, &not_found_json("namespaces", "hypershift"))
            .into_client();

        let err = namespace_labels(&client, "hypershift").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
