// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Hub install detection, hypershift operator health and the OIDC S3 secret.

use crate::constants::hub::{
    ADDON_NAME, EXTERNAL_DNS_OPERATOR, HYPERSHIFT_NAMESPACE, HYPERSHIFT_OPERATOR, S3_OIDC_SECRET_NAME,
};
use crate::constants::LOCAL_CLUSTER_NAME;
use crate::error::{E2eError, Result};
use crate::hub::managed_clusters::wait_for_addon_available;
use crate::kubernetes::ResourceClient;
use crate::types::hosted_cluster::OperatorInstallView;
use crate::types::resource::{MULTICLUSTER_ENGINE, MULTICLUSTER_HUB};
use crate::types::{decode, ResourceType};
use crate::wait::{poll_until, PollSettings, PollStep};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Secret};
use k8s_openapi::ByteString;
use kube::api::{ListParams, ObjectMeta, Patch, PatchParams, PostParams};
use kube::{Api, Client, ResourceExt};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Access key pair for the OIDC discovery bucket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

async fn is_installed(resources: &ResourceClient, resource_type: &ResourceType) -> Result<bool> {
    match resources.first(resource_type).await {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Whether ACM is installed, i.e. a MultiClusterHub exists anywhere
pub async fn is_acm_installed(resources: &ResourceClient) -> Result<bool> {
    is_installed(resources, &MULTICLUSTER_HUB).await
}

pub async fn is_mce_installed(resources: &ResourceClient) -> Result<bool> {
    is_installed(resources, &MULTICLUSTER_ENGINE).await
}

async fn target_namespace(resources: &ResourceClient, resource_type: &ResourceType) -> Result<String> {
    let view: OperatorInstallView = decode(&resources.first(resource_type).await?)?;
    view.spec.target_namespace.ok_or_else(|| E2eError::MalformedResource {
        resource: resource_type.kind.to_string(),
        reason: "spec.targetNamespace is not set".to_string(),
    })
}

pub async fn acm_namespace(resources: &ResourceClient) -> Result<String> {
    target_namespace(resources, &MULTICLUSTER_HUB).await
}

pub async fn mce_namespace(resources: &ResourceClient) -> Result<String> {
    target_namespace(resources, &MULTICLUSTER_ENGINE).await
}

/// Available replicas equal the desired count. Desired defaults to 1.
pub fn deployment_ready(deployment: &Deployment) -> bool {
    let desired = deployment.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
    let available = deployment
        .status
        .as_ref()
        .and_then(|s| s.available_replicas)
        .unwrap_or(0);
    available == desired
}

pub async fn deployment_exists(client: &Client, namespace: &str, name: &str) -> Result<bool> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    Ok(deployments.get_opt(name).await?.is_some())
}

/// Both hypershift operator deployments have all replicas available.
#[instrument(skip(client))]
pub async fn check_operator_healthy(client: &Client) -> Result<()> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), HYPERSHIFT_NAMESPACE);
    for name in [HYPERSHIFT_OPERATOR, EXTERNAL_DNS_OPERATOR] {
        let deployment = deployments.get(name).await?;
        if !deployment_ready(&deployment) {
            return Err(E2eError::AssertionFailed(format!(
                "deployment {}/{} is not healthy: available replicas do not match desired",
                HYPERSHIFT_NAMESPACE, name
            )));
        }
        debug!("Deployment {}/{} is healthy", HYPERSHIFT_NAMESPACE, name);
    }
    info!("Hypershift operator is healthy");
    Ok(())
}

/// Poll until the hypershift operator is healthy. Missing deployments
/// count as not healthy yet.
pub async fn wait_for_operator_healthy(client: &Client, settings: &PollSettings) -> Result<()> {
    poll_until("hypershift operator to be healthy", settings, move || async move {
        match check_operator_healthy(client).await {
            Ok(()) => Ok(PollStep::Ready(())),
            Err(e @ E2eError::AssertionFailed(_)) => Ok(PollStep::Pending(e.to_string())),
            Err(e) if e.is_not_found() => Ok(PollStep::Pending(e.to_string())),
            Err(e) => Err(e),
        }
    })
    .await
}

/// The hypershift add-on on the hub's own managed cluster reports Available.
pub async fn wait_for_hub_addon_available(resources: &ResourceClient, settings: &PollSettings) -> Result<()> {
    wait_for_addon_available(resources, LOCAL_CLUSTER_NAME, ADDON_NAME, settings).await
}

pub fn oidc_secret(bucket: &str, region: &str, credentials: &S3Credentials) -> Secret {
    let aws_credentials = format!(
        "[default]\naws_access_key_id = {}\naws_secret_access_key = {}",
        credentials.access_key_id, credentials.secret_access_key
    );
    Secret {
        metadata: ObjectMeta {
            name: Some(S3_OIDC_SECRET_NAME.to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([
            ("bucket".to_string(), ByteString(bucket.as_bytes().to_vec())),
            ("credentials".to_string(), ByteString(aws_credentials.into_bytes())),
            ("region".to_string(), ByteString(region.as_bytes().to_vec())),
        ])),
        ..Default::default()
    }
}

/// Create the OIDC provider S3 secret. Returns `false` when it already
/// existed.
#[instrument(skip(client, credentials))]
pub async fn create_oidc_secret(
    client: &Client,
    namespace: &str,
    bucket: &str,
    region: &str,
    credentials: &S3Credentials,
) -> Result<bool> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    match secrets
        .create(&PostParams::default(), &oidc_secret(bucket, region, credentials))
        .await
    {
        Ok(_) => {
            info!("Created secret {}/{}", namespace, S3_OIDC_SECRET_NAME);
            Ok(true)
        }
        Err(kube::Error::Api(err)) if err.code == 409 => {
            info!("Secret {}/{} already exists", namespace, S3_OIDC_SECRET_NAME);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Add `key=value` to a secret that must already hold `required_key`, then
/// read it back to confirm the write.
#[instrument(skip(client, value))]
pub async fn inject_secret_key(
    client: &Client,
    namespace: &str,
    name: &str,
    required_key: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let secret = secrets
        .get_opt(name)
        .await?
        .ok_or_else(|| E2eError::NotFound(format!("Secret {}/{}", namespace, name)))?;
    let has_required = secret
        .data
        .as_ref()
        .map_or(false, |d| d.contains_key(required_key));
    if !has_required {
        return Err(E2eError::AssertionFailed(format!(
            "key '{}' does not exist in secret {}/{}",
            required_key, namespace, name
        )));
    }

    secrets
        .patch(name, &PatchParams::default(), &Patch::Merge(json!({"stringData": {key: value}})))
        .await?;

    let updated = secrets.get(name).await?;
    let stored = updated.data.as_ref().and_then(|d| d.get(key)).map(|b| b.0.as_slice());
    if stored != Some(value.as_bytes()) {
        return Err(E2eError::AssertionFailed(format!(
            "key '{}' was not stored in secret {}/{}",
            key, namespace, name
        )));
    }
    info!("Added key {} to secret {}/{}", key, namespace, name);
    Ok(())
}

pub async fn remove_secret_key(client: &Client, namespace: &str, name: &str, key: &str) -> Result<()> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    secrets
        .patch(name, &PatchParams::default(), &Patch::Merge(json!({"data": {key: null}})))
        .await?;
    info!("Removed key {} from secret {}/{}", key, namespace, name);
    Ok(())
}

/// The most recently created pod in `namespace` whose name starts with
/// `prefix` (any pod when empty).
pub async fn latest_pod(client: &Client, namespace: &str, prefix: &str) -> Result<Option<Pod>> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let latest = pods
        .list(&ListParams::default())
        .await?
        .items
        .into_iter()
        .filter(|p| p.name_any().starts_with(prefix))
        .max_by_key(|p| p.metadata.creation_timestamp.clone().map(|t| t.0));
    match &latest {
        Some(pod) => debug!("Latest pod in {} with prefix {:?}: {}", namespace, prefix, pod.name_any()),
        None => warn!("No pods in {} with prefix {:?}", namespace, prefix),
    }
    Ok(latest)
}
