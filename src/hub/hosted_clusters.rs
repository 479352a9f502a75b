// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::conditions::{AS_EXPECTED, AVAILABLE, HCP_AVAILABLE_MESSAGE, STATUS_TRUE};
use crate::error::Result;
use crate::hcp::Platform;
use crate::kubernetes::ResourceClient;
use crate::types::hosted_cluster::{HostedClusterView, NodePoolView};
use crate::types::resource::{HOSTED_CLUSTER, NODE_POOL};
use crate::types::{decode, ResourceRef};
use crate::wait::{wait_for_absence, wait_for_condition, ConditionExpectation, PollSettings};
use kube::ResourceExt;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// A hosted cluster found by listing
#[derive(Debug, Clone)]
pub struct HostedClusterEntry {
    pub name: String,
    pub namespace: String,
    pub view: HostedClusterView,
}

pub fn hosted_cluster_ref(name: &str, namespace: &str) -> ResourceRef {
    ResourceRef::namespaced(HOSTED_CLUSTER, namespace, name)
}

/// Hosted clusters in every namespace, optionally only those of `platform`.
#[instrument(skip(resources))]
pub async fn list_hosted_clusters(
    resources: &ResourceClient,
    platform: Option<Platform>,
) -> Result<Vec<HostedClusterEntry>> {
    let mut entries = Vec::new();
    for obj in resources.list(&HOSTED_CLUSTER, "", "").await? {
        let view: HostedClusterView = decode(&obj)?;
        let matches = match platform {
            Some(p) => view
                .platform_type()
                .map_or(false, |t| t.eq_ignore_ascii_case(p.as_str())),
            None => true,
        };
        if matches {
            entries.push(HostedClusterEntry {
                name: obj.name_any(),
                namespace: obj.namespace().unwrap_or_default(),
                view,
            });
        }
    }
    debug!("Found {} hosted cluster(s) for {:?}", entries.len(), platform);
    Ok(entries)
}

/// Number of hosted clusters per `spec.platform.type`
pub async fn count_by_platform(resources: &ResourceClient) -> Result<BTreeMap<String, usize>> {
    let mut counts = BTreeMap::new();
    for entry in list_hosted_clusters(resources, None).await? {
        let platform = entry.view.platform_type().unwrap_or_default().to_string();
        *counts.entry(platform).or_insert(0) += 1;
    }
    Ok(counts)
}

pub async fn get_hosted_cluster(resources: &ResourceClient, name: &str, namespace: &str) -> Result<HostedClusterView> {
    decode(&resources.get(&hosted_cluster_ref(name, namespace)).await?)
}

/// Wait for the hosted control plane to report itself available.
pub async fn wait_for_control_plane_available(
    resources: &ResourceClient,
    name: &str,
    namespace: &str,
    settings: &PollSettings,
) -> Result<()> {
    info!("Waiting for hosted control plane {}/{} to be available", namespace, name);
    let expectation = ConditionExpectation::new(AVAILABLE, STATUS_TRUE)
        .with_reason(AS_EXPECTED)
        .with_message(HCP_AVAILABLE_MESSAGE);
    wait_for_condition(resources, &hosted_cluster_ref(name, namespace), &expectation, settings).await?;
    Ok(())
}

pub async fn wait_for_destroyed(
    resources: &ResourceClient,
    name: &str,
    namespace: &str,
    settings: &PollSettings,
) -> Result<()> {
    info!("Waiting for hosted cluster {}/{} to be destroyed", namespace, name);
    wait_for_absence(resources, &hosted_cluster_ref(name, namespace), settings).await
}

/// Node pools of a hosted cluster, keyed by node pool name
#[instrument(skip(resources))]
pub async fn node_pools(
    resources: &ResourceClient,
    hosted_cluster: &str,
    namespace: &str,
) -> Result<BTreeMap<String, NodePoolView>> {
    let mut pools = BTreeMap::new();
    for obj in resources.list(&NODE_POOL, namespace, "").await? {
        let view: NodePoolView = decode(&obj)?;
        if view.belongs_to(hosted_cluster) {
            pools.insert(obj.name_any(), view);
        }
    }
    Ok(pools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{condition_json, hosted_cluster_json, list_json, object_json, MockService};
    use serde_json::json;
    use std::time::Duration;

    const HC_LIST_PATH: &str = "/apis/hypershift.openshift.io/v1beta1/hostedclusters";
    const NP_LIST_PATH: &str = "/apis/hypershift.openshift.io/v1beta1/namespaces/clusters/nodepools";

    fn clusters() -> String {
        let items = vec![
            serde_json::from_str(&hosted_cluster_json("aws-1", "clusters", "AWS", json!([]))).unwrap(),
            serde_json::from_str(&hosted_cluster_json("kv-1", "clusters", "KubeVirt", json!([]))).unwrap(),
            serde_json::from_str(&hosted_cluster_json("aws-2", "other", "AWS", json!([]))).unwrap(),
        ];
        list_json(&HOSTED_CLUSTER, items)
    }

    #[tokio::test]
    async fn test_list_filters_by_platform() {
        let resources = ResourceClient::new(MockService::new().on_get(HC_LIST_PATH, 200, &clusters()).into_client());

        let aws = list_hosted_clusters(&resources, Some(Platform::Aws)).await.unwrap();
        let names: Vec<_> = aws.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["aws-1", "aws-2"]);
        assert_eq!(aws[1].namespace, "other");

        let kubevirt = list_hosted_clusters(&resources, Some(Platform::KubeVirt)).await.unwrap();
        assert_eq!(kubevirt.len(), 1);

        assert!(list_hosted_clusters(&resources, Some(Platform::Agent)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_by_platform() {
        let resources = ResourceClient::new(MockService::new().on_get(HC_LIST_PATH, 200, &clusters()).into_client());

        let counts = count_by_platform(&resources).await.unwrap();
        assert_eq!(counts.get("AWS"), Some(&2));
        assert_eq!(counts.get("KubeVirt"), Some(&1));
    }

    #[tokio::test]
    async fn test_control_plane_available() {
        let body = hosted_cluster_json(
            "demo-cluster",
            "clusters",
            "AWS",
            json!([condition_json(AVAILABLE, "True", AS_EXPECTED, HCP_AVAILABLE_MESSAGE)]),
        );
        let resources = ResourceClient::new(
            MockService::new()
                .on_get(
                    "/apis/hypershift.openshift.io/v1beta1/namespaces/clusters/hostedclusters/demo-cluster",
                    200,
                    &body,
                )
                .into_client(),
        );
        let settings = PollSettings::new(Duration::from_millis(5), Duration::from_millis(100));

        wait_for_control_plane_available(&resources, "demo-cluster", "clusters", &settings)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_node_pools_of_cluster() {
        let pool = |name: &str, cluster: &str| {
            object_json(
                &NODE_POOL,
                "clusters",
                name,
                json!({"spec": {"clusterName": cluster, "release": {"image": "img:4.19.22"}}}),
            )
        };
        let body = list_json(&NODE_POOL, vec![pool("demo-us-east-1a", "demo"), pool("other-pool", "other")]);
        let resources = ResourceClient::new(MockService::new().on_get(NP_LIST_PATH, 200, &body).into_client());

        let pools = node_pools(&resources, "demo", "clusters").await.unwrap();
        assert_eq!(pools.len(), 1);
        assert_eq!(pools["demo-us-east-1a"].release_image(), Some("img:4.19.22"));
    }
}
