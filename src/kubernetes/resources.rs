// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Generic access to any resource kind through the dynamic API.
//!
//! Nothing here retries; callers that need to wait use [`crate::wait`].

use crate::constants::FIELD_MANAGER;
use crate::error::{E2eError, Result};
use crate::types::{ResourceRef, ResourceType};
use kube::api::{DeleteParams, DynamicObject, ListParams, Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct ResourceClient {
    client: Client,
}

impl ResourceClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn api(&self, resource_type: &ResourceType, namespace: Option<&str>) -> Api<DynamicObject> {
        let ar = resource_type.api_resource();
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &ar),
            None => Api::all_with(self.client.clone(), &ar),
        }
    }

    fn api_for(&self, resource: &ResourceRef) -> Api<DynamicObject> {
        self.api(&resource.resource_type, resource.namespace.as_deref())
    }

    /// Fetch a resource. A 404 is reported as [`E2eError::NotFound`].
    #[instrument(skip(self), fields(resource = %resource))]
    pub async fn get(&self, resource: &ResourceRef) -> Result<DynamicObject> {
        self.get_opt(resource)
            .await?
            .ok_or_else(|| E2eError::NotFound(resource.to_string()))
    }

    pub async fn get_opt(&self, resource: &ResourceRef) -> Result<Option<DynamicObject>> {
        Ok(self.api_for(resource).get_opt(&resource.name).await?)
    }

    /// List instances of a kind. An empty namespace lists across all
    /// namespaces and an empty selector matches everything.
    #[instrument(skip(self), fields(kind = resource_type.kind))]
    pub async fn list(
        &self,
        resource_type: &ResourceType,
        namespace: &str,
        label_selector: &str,
    ) -> Result<Vec<DynamicObject>> {
        let namespace = (!namespace.is_empty()).then_some(namespace);
        let mut params = ListParams::default();
        if !label_selector.is_empty() {
            params = params.labels(label_selector);
        }

        let list = self.api(resource_type, namespace).list(&params).await?;
        debug!("Found {} {} instance(s)", list.items.len(), resource_type.kind);
        Ok(list.items)
    }

    /// The first instance of a kind anywhere on the cluster. Used for
    /// singletons whose name and namespace are not known up front.
    pub async fn first(&self, resource_type: &ResourceType) -> Result<DynamicObject> {
        match self.list(resource_type, "", "").await {
            Ok(items) => items
                .into_iter()
                .next()
                .ok_or_else(|| E2eError::NotFound(format!("any {}", resource_type.kind))),
            Err(e) if e.is_not_found() => Err(E2eError::NotFound(format!("any {}", resource_type.kind))),
            Err(e) => Err(e),
        }
    }

    pub async fn exists(&self, resource: &ResourceRef) -> Result<bool> {
        Ok(self.get_opt(resource).await?.is_some())
    }

    pub async fn labels(&self, resource: &ResourceRef) -> Result<BTreeMap<String, String>> {
        let obj = self.get(resource).await?;
        debug!("Labels of {}: {:?}", resource, obj.labels());
        Ok(obj.labels().clone())
    }

    pub async fn annotations(&self, resource: &ResourceRef) -> Result<BTreeMap<String, String>> {
        let obj = self.get(resource).await?;
        debug!("Annotations of {}: {:?}", resource, obj.annotations());
        Ok(obj.annotations().clone())
    }

    #[instrument(skip(self, patch), fields(resource = %resource))]
    pub async fn merge_patch(
        &self,
        resource: &ResourceRef,
        patch: serde_json::Value,
    ) -> Result<DynamicObject> {
        debug!("Merge patching {} with {}", resource, patch);
        Ok(self
            .api_for(resource)
            .patch(&resource.name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?)
    }

    /// Server-side apply, taking ownership of conflicting fields.
    #[instrument(skip(self, object), fields(resource = %resource))]
    pub async fn apply<T: Serialize + std::fmt::Debug>(&self, resource: &ResourceRef, object: &T) -> Result<DynamicObject> {
        let params = PatchParams::apply(FIELD_MANAGER).force();
        Ok(self
            .api_for(resource)
            .patch(&resource.name, &params, &Patch::Apply(object))
            .await?)
    }

    /// Delete a resource. Returns `false` when it was already gone.
    #[instrument(skip(self), fields(resource = %resource))]
    pub async fn delete(&self, resource: &ResourceRef) -> Result<bool> {
        match self
            .api_for(resource)
            .delete(&resource.name, &DeleteParams::default())
            .await
        {
            Ok(_) => Ok(true),
            Err(kube::Error::Api(err)) if err.code == 404 => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{hosted_cluster_json, list_json, not_found_json, MockService};
    use crate::types::resource::{HOSTED_CLUSTER, MANAGED_CLUSTER, MULTICLUSTER_HUB};
    use serde_json::json;

    const HC_PATH: &str = "/apis/hypershift.openshift.io/v1beta1/namespaces/clusters/hostedclusters/demo-cluster";

    fn demo_ref() -> ResourceRef {
        ResourceRef::namespaced(HOSTED_CLUSTER, "clusters", "demo-cluster")
    }

    #[tokio::test]
    async fn test_get_existing() {
        let body = hosted_cluster_json("demo-cluster", "clusters", "AWS", json!([]));
        let client = MockService::new().on_get(HC_PATH, 200, &body).into_client();
        let resources = ResourceClient::new(client);

        let obj = resources.get(&demo_ref()).await.unwrap();
        assert_eq!(obj.name_any(), "demo-cluster");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let client = MockService::new()
            .on_get(HC_PATH, 404, &not_found_json("hostedclusters", "demo-cluster"))
            .into_client();
        let resources = ResourceClient::new(client);

        let err = resources.get(&demo_ref()).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("HostedCluster clusters/demo-cluster"));
    }

    #[tokio::test]
    async fn test_exists_collapses_not_found() {
        let client = MockService::new()
            .on_get(HC_PATH, 404, &not_found_json("hostedclusters", "demo-cluster"))
            .into_client();
        let resources = ResourceClient::new(client);

        assert!(!resources.exists(&demo_ref()).await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_propagates_other_errors() {
        let forbidden = json!({
            "kind": "Status", "apiVersion": "v1", "status": "Failure",
            "message": "forbidden", "reason": "Forbidden", "code": 403
        })
        .to_string();
        let client = MockService::new().on_get(HC_PATH, 403, &forbidden).into_client();
        let resources = ResourceClient::new(client);

        let err = resources.exists(&demo_ref()).await.unwrap_err();
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_cluster_scoped_get_uses_cluster_path() {
        let body = json!({
            "apiVersion": "cluster.open-cluster-management.io/v1",
            "kind": "ManagedCluster",
            "metadata": {"name": "demo-cluster", "labels": {"vendor": "OpenShift"}}
        })
        .to_string();
        let client = MockService::new()
            .on_get("/apis/cluster.open-cluster-management.io/v1/managedclusters/demo-cluster", 200, &body)
            .into_client();
        let resources = ResourceClient::new(client);

        let labels = resources
            .labels(&ResourceRef::cluster(MANAGED_CLUSTER, "demo-cluster"))
            .await
            .unwrap();
        assert_eq!(labels.get("vendor").map(String::as_str), Some("OpenShift"));
    }

    #[tokio::test]
    async fn test_first_of_empty_list_is_not_found() {
        let client = MockService::new()
            .on_get(
                "/apis/operator.open-cluster-management.io/v1/multiclusterhubs",
                200,
                &list_json(&MULTICLUSTER_HUB, vec![]),
            )
            .into_client();
        let resources = ResourceClient::new(client);

        let err = resources.first(&MULTICLUSTER_HUB).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_all_namespaces() {
        let items = vec![
            serde_json::from_str(&hosted_cluster_json("a", "clusters", "AWS", json!([]))).unwrap(),
            serde_json::from_str(&hosted_cluster_json("b", "other", "KubeVirt", json!([]))).unwrap(),
        ];
        let client = MockService::new()
            .on_get(
                "/apis/hypershift.openshift.io/v1beta1/hostedclusters",
                200,
                &list_json(&HOSTED_CLUSTER, items),
            )
            .into_client();
        let resources = ResourceClient::new(client);

        let list = resources.list(&HOSTED_CLUSTER, "", "").await.unwrap();
        assert_eq!(list.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let client = MockService::new()
            .on_delete(HC_PATH, 404, &not_found_json("hostedclusters", "demo-cluster"))
            .into_client();
        let resources = ResourceClient::new(client);

        assert!(!resources.delete(&demo_ref()).await.unwrap());
    }

    #[tokio::test]
    async fn test_merge_patch_sends_body() {
        let body = hosted_cluster_json("demo-cluster", "clusters", "AWS", json!([]));
        let mock = MockService::new().on_patch(HC_PATH, 200, &body);
        let recorder = mock.clone();
        let resources = ResourceClient::new(mock.into_client());

        resources
            .merge_patch(&demo_ref(), json!({"spec": {"channel": "fast-4.19"}}))
            .await
            .unwrap();

        let requests = recorder.requests("PATCH", HC_PATH);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["spec"]["channel"], "fast-4.19");
    }

    #[tokio::test]
    async fn test_apply_sends_typed_object() {
        #[derive(Debug, Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ChannelPatch {
            api_version: &'static str,
            kind: &'static str,
            spec: serde_json::Value,
        }

        let body = hosted_cluster_json("demo-cluster", "clusters", "AWS", json!([]));
        let mock = MockService::new().on_patch(HC_PATH, 200, &body);
        let recorder = mock.clone();
        let resources = ResourceClient::new(mock.into_client());

        let patch = ChannelPatch {
            api_version: "hypershift.openshift.io/v1beta1",
            kind: "HostedCluster",
            spec: json!({"channel": "stable-4.19"}),
        };
        resources.apply(&demo_ref(), &patch).await.unwrap();

        let requests = recorder.requests("PATCH", HC_PATH);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["kind"], "HostedCluster");
        assert_eq!(requests[0]["spec"]["channel"], "stable-4.19");
    }
}
