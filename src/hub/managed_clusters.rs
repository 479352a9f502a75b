// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ManagedCluster import state and add-on availability.

use crate::constants::annotations::{CREATED_VIA, HOSTING_CLUSTER_NAME, KLUSTERLET_DEPLOY_MODE};
use crate::constants::conditions::{AVAILABLE, MANAGED_CLUSTER_AVAILABLE, STATUS_TRUE};
use crate::constants::labels::{CLOUD, CLUSTERSET, NAME, VENDOR};
use crate::constants::LOCAL_CLUSTER_NAME;
use crate::error::{E2eError, Result};
use crate::hcp::Platform;
use crate::kubernetes::ResourceClient;
use crate::types::resource::{MANAGED_CLUSTER, MANAGED_CLUSTER_ADDON};
use crate::types::ResourceRef;
use crate::wait::{wait_for_absence, wait_for_condition, ConditionExpectation, PollSettings};
use kube::ResourceExt;
use std::collections::BTreeMap;
use tracing::info;

/// Add-ons every imported cluster gets from the multicluster engine
pub const MCE_ADDONS: &[&str] = &["cluster-proxy", "work-manager"];

/// Add-ons every imported cluster gets when ACM is installed
pub const ACM_ADDONS: &[&str] = &[
    "application-manager",
    "cert-policy-controller",
    "cluster-proxy",
    "iam-policy-controller",
    "governance-policy-framework",
    "search-collector",
    "work-manager",
];

pub fn managed_cluster_ref(name: &str) -> ResourceRef {
    ResourceRef::cluster(MANAGED_CLUSTER, name)
}

pub fn addon_ref(cluster: &str, addon: &str) -> ResourceRef {
    ResourceRef::namespaced(MANAGED_CLUSTER_ADDON, cluster, addon)
}

pub fn expected_addons(acm_installed: bool) -> &'static [&'static str] {
    if acm_installed {
        ACM_ADDONS
    } else {
        MCE_ADDONS
    }
}

/// Labels the import controller puts on a hosted cluster's ManagedCluster
pub fn expected_labels(cluster: &str, platform: Platform) -> BTreeMap<String, String> {
    [
        (NAME, cluster),
        (CLOUD, platform.cloud_label()),
        (CLUSTERSET, "default"),
        (VENDOR, "OpenShift"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Annotations marking a ManagedCluster as imported in hosted mode
pub fn expected_annotations() -> BTreeMap<String, String> {
    [
        (KLUSTERLET_DEPLOY_MODE, "Hosted"),
        (HOSTING_CLUSTER_NAME, LOCAL_CLUSTER_NAME),
        (CREATED_VIA, "hypershift"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub async fn wait_for_imported(resources: &ResourceClient, cluster: &str, settings: &PollSettings) -> Result<()> {
    info!("Waiting for managed cluster {} to be imported", cluster);
    let expectation = ConditionExpectation::new(MANAGED_CLUSTER_AVAILABLE, STATUS_TRUE);
    wait_for_condition(resources, &managed_cluster_ref(cluster), &expectation, settings).await?;
    Ok(())
}

pub async fn wait_for_detached(resources: &ResourceClient, cluster: &str, settings: &PollSettings) -> Result<()> {
    info!("Waiting for managed cluster {} to be detached", cluster);
    wait_for_absence(resources, &managed_cluster_ref(cluster), settings).await
}

pub async fn wait_for_addon_available(
    resources: &ResourceClient,
    cluster: &str,
    addon: &str,
    settings: &PollSettings,
) -> Result<()> {
    let expectation = ConditionExpectation::new(AVAILABLE, STATUS_TRUE);
    wait_for_condition(resources, &addon_ref(cluster, addon), &expectation, settings).await?;
    info!("Add-on {} of cluster {} is available", addon, cluster);
    Ok(())
}

/// Wait for each named add-on in turn.
pub async fn wait_for_addons_available(
    resources: &ResourceClient,
    cluster: &str,
    addons: &[&str],
    settings: &PollSettings,
) -> Result<()> {
    for addon in addons {
        wait_for_addon_available(resources, cluster, addon, settings).await?;
    }
    Ok(())
}

/// Wait for every add-on currently present in the cluster namespace. At
/// least one must exist.
pub async fn wait_for_present_addons_available(
    resources: &ResourceClient,
    cluster: &str,
    settings: &PollSettings,
) -> Result<()> {
    let addons: Vec<String> = resources
        .list(&MANAGED_CLUSTER_ADDON, cluster, "")
        .await?
        .iter()
        .map(|a| a.name_any())
        .collect();
    if addons.is_empty() {
        return Err(E2eError::AssertionFailed(format!(
            "no ManagedClusterAddOns found for cluster {}",
            cluster
        )));
    }
    let names: Vec<&str> = addons.iter().map(String::as_str).collect();
    wait_for_addons_available(resources, cluster, &names, settings).await
}
