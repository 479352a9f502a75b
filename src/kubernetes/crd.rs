// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! API group availability checks

use crate::error::Result;
use kube::{discovery::Discovery, Client};
use tracing::{debug, instrument};

/// Whether the API server serves `group` at all.
///
/// Used to skip checks for optional platform APIs, e.g. the OpenShift
/// console group on a plain Kubernetes hub.
#[instrument(skip(client))]
pub async fn api_group_served(client: &Client, group: &str) -> Result<bool> {
    let discovery = Discovery::new(client.clone()).filter(&[group]).run().await?;
    let served = discovery.has_group(group);
    debug!("API group {} served: {}", group, served);
    Ok(served)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockService;
    use serde_json::json;

    #[tokio::test]
    async fn test_group_missing() {
        let groups = json!({"kind": "APIGroupList", "apiVersion": "v1", "groups": []}).to_string();
        let client = MockService::new().on_get("/apis", 200, &groups).into_client();

        assert!(!api_group_served(&client, "console.openshift.io").await.unwrap());
    }

    #[tokio::test]
    async fn test_group_served() {
        let groups = json!({
            "kind": "APIGroupList",
            "apiVersion": "v1",
            "groups": [{
                "name": "console.openshift.io",
                "versions": [{"groupVersion": "console.openshift.io/v1", "version": "v1"}],
                "preferredVersion": {"groupVersion": "console.openshift.io/v1", "version": "v1"}
            }]
        })
        .to_string();
        let resources = json!({
            "kind": "APIResourceList",
            "apiVersion": "v1",
            "groupVersion": "console.openshift.io/v1",
            "resources": [{
                "name": "consoleclidownloads",
                "singularName": "consoleclidownload",
                "namespaced": false,
                "kind": "ConsoleCLIDownload",
                "verbs": ["get", "list"]
            }]
        })
        .to_string();
        let client = MockService::new()
            .on_get("/apis", 200, &groups)
            .on_get("/apis/console.openshift.io/v1", 200, &resources)
            .into_client();

        assert!(api_group_served(&client, "console.openshift.io").await.unwrap());
    }
}
