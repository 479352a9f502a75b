// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Hosted cluster upgrades driven by a ClusterCurator without Ansible hooks.

use super::{Outcome, Suite};
use crate::config::Config;
use crate::constants::conditions::{CURATOR_JOB, JOB_HAS_FINISHED, STATUS_TRUE};
use crate::constants::poll;
use crate::hub::curator::{
    apply_curator, minimal_curator, set_desired_curation, set_upgrade_channel, set_upgrade_target,
    wait_for_curator_condition,
};
use crate::hub::hosted_clusters::{get_hosted_cluster, node_pools as list_node_pools};
use crate::types::curator::{Curation, UpgradeType};
use crate::types::hosted_cluster::HostedClusterView;
use crate::wait::{ConditionExpectation, PollSettings};
use anyhow::{bail, Context, Result};
use tracing::info;

/// Why an upgrade of `wanted` type cannot run with these settings, if it
/// cannot. The curator controller rejects an upgrade without a target version.
pub fn upgrade_skip_reason(config: &Config, wanted: UpgradeType) -> Option<String> {
    if config.upgrade_type != Some(wanted) {
        return Some(format!(
            "requires upgradeType={} (HCP_UPGRADE_TYPE or options.clustercurator.upgradeType)",
            wanted
        ));
    }
    if config.desired_update.is_empty() {
        return Some(
            "requires a desired update (HCP_UPGRADE_DESIRED_UPDATE or options.clustercurator.desiredUpdate)"
                .to_string(),
        );
    }
    None
}

/// The cluster to upgrade, which must exist.
async fn target_cluster(suite: &Suite) -> Result<(&str, &str, HostedClusterView)> {
    let config = &suite.config;
    let name = config.cluster_name.as_str();
    if name.is_empty() {
        bail!("HCP_CLUSTER_NAME or options.clusters.aws.clusterName must be set");
    }
    let namespace = config.namespace.as_str();
    let view = get_hosted_cluster(&suite.resources, name, namespace)
        .await
        .with_context(|| format!("HostedCluster {}/{} must exist", namespace, name))?;
    Ok((name, namespace, view))
}

/// Start the upgrade and wait for the curator job to finish.
async fn run_upgrade(suite: &Suite, name: &str, namespace: &str, settings: &PollSettings) -> Result<()> {
    set_desired_curation(&suite.resources, name, namespace, Curation::Upgrade).await?;
    let finished = ConditionExpectation::new(CURATOR_JOB, STATUS_TRUE).with_reason(JOB_HAS_FINISHED);
    wait_for_curator_condition(&suite.resources, name, namespace, &finished, settings)
        .await
        .context("curator upgrade job did not finish")?;
    Ok(())
}

/// Move the cluster to the configured channel without changing its version.
pub async fn channel(suite: &Suite) -> Result<Outcome> {
    let (name, namespace, _) = target_cluster(suite).await?;
    let channel = suite.config.upgrade_channel.as_str();

    apply_curator(&suite.resources, &minimal_curator(name, namespace)).await?;
    set_upgrade_channel(&suite.resources, name, namespace, channel).await?;
    run_upgrade(suite, name, namespace, &suite.upgrade_wait(poll::CHANNEL_UPGRADE_TIMEOUT)).await?;

    let view = get_hosted_cluster(&suite.resources, name, namespace).await?;
    let actual = view.channel().unwrap_or_default();
    if actual != channel {
        bail!("HostedCluster {} channel should be {:?}, got {:?}", name, channel, actual);
    }
    info!("HostedCluster {} channel is {}", name, actual);
    Ok(Outcome::Passed)
}

pub async fn control_plane(suite: &Suite) -> Result<Outcome> {
    let (name, namespace, _) = target_cluster(suite).await?;
    if let Some(reason) = upgrade_skip_reason(&suite.config, UpgradeType::ControlPlane) {
        return Ok(Outcome::Skipped(reason));
    }
    let config = &suite.config;

    apply_curator(&suite.resources, &minimal_curator(name, namespace)).await?;
    set_upgrade_channel(&suite.resources, name, namespace, &config.upgrade_channel).await?;
    set_upgrade_target(
        &suite.resources,
        name,
        namespace,
        &config.desired_update,
        UpgradeType::ControlPlane,
    )
    .await?;
    run_upgrade(suite, name, namespace, &suite.upgrade_wait(poll::CONTROL_PLANE_UPGRADE_TIMEOUT)).await?;

    let view = get_hosted_cluster(&suite.resources, name, namespace).await?;
    let release = view.release_image().unwrap_or_default();
    if !release.contains(&config.desired_update) {
        bail!(
            "HostedCluster {} release should contain {:?}, got {:?}",
            name,
            config.desired_update,
            release
        );
    }
    info!("HostedCluster {} release image is {}", name, release);
    Ok(Outcome::Passed)
}

/// Upgrade only the workers. The control plane release is logged but not
/// checked since earlier upgrades may already have moved it.
pub async fn node_pools(suite: &Suite) -> Result<Outcome> {
    let (name, namespace, _) = target_cluster(suite).await?;
    if let Some(reason) = upgrade_skip_reason(&suite.config, UpgradeType::NodePools) {
        return Ok(Outcome::Skipped(reason));
    }
    let config = &suite.config;

    if list_node_pools(&suite.resources, name, namespace).await?.is_empty() {
        bail!("HostedCluster {} has no NodePools to upgrade", name);
    }

    apply_curator(&suite.resources, &minimal_curator(name, namespace)).await?;
    set_upgrade_target(
        &suite.resources,
        name,
        namespace,
        &config.desired_update,
        UpgradeType::NodePools,
    )
    .await?;
    run_upgrade(suite, name, namespace, &suite.upgrade_wait(poll::NODEPOOL_UPGRADE_TIMEOUT)).await?;

    let pools = list_node_pools(&suite.resources, name, namespace).await?;
    if pools.is_empty() {
        bail!("NodePools of HostedCluster {} disappeared during the upgrade", name);
    }
    for (pool, view) in &pools {
        let release = view.release_image().unwrap_or_default();
        if !release.contains(&config.desired_update) {
            bail!(
                "NodePool {} release should contain {:?}, got {:?}",
                pool,
                config.desired_update,
                release
            );
        }
        info!("NodePool {} release image is {}", pool, release);
    }

    let view = get_hosted_cluster(&suite.resources, name, namespace).await?;
    info!(
        "HostedCluster {} control plane release image is {}",
        name,
        view.release_image().unwrap_or_default()
    );
    Ok(Outcome::Passed)
}

/// Log the channels the cluster version operator offers. The list may be
/// empty while the cluster is still provisioning.
pub async fn available_channels(suite: &Suite) -> Result<Outcome> {
    let (name, _, view) = target_cluster(suite).await?;
    info!("HostedCluster {} available channels: {:?}", name, view.available_channels());
    Ok(Outcome::Passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::scenarios::testing::suite;
    use crate::test_utils::{condition_json, list_json, object_json, MockService};
    use crate::types::resource::{CLUSTER_CURATOR, HOSTED_CLUSTER, NODE_POOL};
    use serde_json::json;

    const HC_PATH: &str = "/apis/hypershift.openshift.io/v1beta1/namespaces/clusters/hostedclusters/demo";
    const NP_LIST_PATH: &str = "/apis/hypershift.openshift.io/v1beta1/namespaces/clusters/nodepools";
    const CC_PATH: &str =
        "/apis/cluster.open-cluster-management.io/v1beta1/namespaces/clusters/clustercurators/demo";

    fn hosted_cluster(channel: &str, image: &str) -> String {
        object_json(
            &HOSTED_CLUSTER,
            "clusters",
            "demo",
            json!({
                "spec": {"platform": {"type": "AWS"}, "channel": channel, "release": {"image": image}},
                "status": {"version": {"desired": {"channels": ["stable-4.19", "fast-4.19"]}}}
            }),
        )
        .to_string()
    }

    fn finished_curator() -> String {
        object_json(
            &CLUSTER_CURATOR,
            "clusters",
            "demo",
            json!({"status": {"conditions": [condition_json(
                "clustercurator-job",
                "True",
                "Job_has_finished",
                "curator-job-x DesiredCuration: upgrade"
            )]}}),
        )
        .to_string()
    }

    fn node_pool(image: &str) -> serde_json::Value {
        object_json(
            &NODE_POOL,
            "clusters",
            "demo-workers",
            json!({"spec": {"clusterName": "demo", "release": {"image": image}}}),
        )
    }

    fn config(env: &[(&str, &str)]) -> Config {
        Config::resolve(&Options::default(), |name| {
            env.iter().find(|(k, _)| *k == name).map(|(_, v)| v.to_string())
        })
        .unwrap()
    }

    #[test]
    fn test_skip_reasons() {
        let missing_type = config(&[("HCP_UPGRADE_DESIRED_UPDATE", "4.19.22")]);
        assert!(upgrade_skip_reason(&missing_type, UpgradeType::ControlPlane)
            .unwrap()
            .contains("upgradeType=ControlPlane"));

        let wrong_type = config(&[("HCP_UPGRADE_TYPE", "NodePools"), ("HCP_UPGRADE_DESIRED_UPDATE", "4.19.22")]);
        assert!(upgrade_skip_reason(&wrong_type, UpgradeType::ControlPlane).is_some());
        assert!(upgrade_skip_reason(&wrong_type, UpgradeType::NodePools).is_none());

        let no_target = config(&[("HCP_UPGRADE_TYPE", "NodePools")]);
        assert!(upgrade_skip_reason(&no_target, UpgradeType::NodePools)
            .unwrap()
            .contains("desired update"));
    }

    #[tokio::test]
    async fn test_channel_upgrade() {
        let mock = MockService::new()
            .on_get_sequence(
                HC_PATH,
                vec![
                    (200, hosted_cluster("fast-4.14", "quay.io/ocp-release:4.19.20-multi")),
                    (200, hosted_cluster("stable-4.19", "quay.io/ocp-release:4.19.20-multi")),
                ],
            )
            .on_patch(CC_PATH, 200, &finished_curator())
            .on_get(CC_PATH, 200, &finished_curator());
        let recorder = mock.clone();
        let suite = suite(mock, &[("HCP_CLUSTER_NAME", "demo"), ("HCP_UPGRADE_CHANNEL", "stable-4.19")]);

        assert_eq!(channel(&suite).await.unwrap(), Outcome::Passed);

        let patches = recorder.requests("PATCH", CC_PATH);
        assert_eq!(patches.len(), 3);
        assert_eq!(patches[0]["spec"], json!({"upgrade": {}}));
        assert_eq!(patches[1]["spec"]["upgrade"]["channel"], "stable-4.19");
        assert_eq!(patches[2]["spec"]["desiredCuration"], "upgrade");
    }

    #[tokio::test]
    async fn test_channel_mismatch_fails() {
        let mock = MockService::new()
            .on_get(HC_PATH, 200, &hosted_cluster("fast-4.14", "quay.io/ocp-release:4.19.20-multi"))
            .on_patch(CC_PATH, 200, &finished_curator())
            .on_get(CC_PATH, 200, &finished_curator());
        let suite = suite(mock, &[("HCP_CLUSTER_NAME", "demo"), ("HCP_UPGRADE_CHANNEL", "stable-4.19")]);

        let err = channel(&suite).await.unwrap_err();
        assert!(err.to_string().contains("channel should be"));
    }

    #[tokio::test]
    async fn test_control_plane_upgrade_skipped_without_type() {
        let mock = MockService::new().on_get(HC_PATH, 200, &hosted_cluster("fast-4.14", "img"));
        let recorder = mock.clone();
        let suite = suite(mock, &[("HCP_CLUSTER_NAME", "demo")]);

        let outcome = control_plane(&suite).await.unwrap();

        assert!(matches!(outcome, Outcome::Skipped(_)));
        assert_eq!(recorder.request_count("PATCH", CC_PATH), 0);
    }

    #[tokio::test]
    async fn test_node_pool_upgrade_checks_every_pool() {
        let mock = MockService::new()
            .on_get(HC_PATH, 200, &hosted_cluster("fast-4.14", "quay.io/ocp-release:4.19.20-multi"))
            .on_get_sequence(
                NP_LIST_PATH,
                vec![
                    (200, list_json(&NODE_POOL, vec![node_pool("quay.io/ocp-release:4.19.20-multi")])),
                    (200, list_json(&NODE_POOL, vec![node_pool("quay.io/ocp-release:4.19.22-multi")])),
                ],
            )
            .on_patch(CC_PATH, 200, &finished_curator())
            .on_get(CC_PATH, 200, &finished_curator());
        let recorder = mock.clone();
        let suite = suite(
            mock,
            &[
                ("HCP_CLUSTER_NAME", "demo"),
                ("HCP_UPGRADE_TYPE", "NodePools"),
                ("HCP_UPGRADE_DESIRED_UPDATE", "4.19.22"),
            ],
        );

        assert_eq!(node_pools(&suite).await.unwrap(), Outcome::Passed);

        let patches = recorder.requests("PATCH", CC_PATH);
        assert_eq!(patches[1]["spec"]["upgrade"]["upgradeType"], "NodePools");
        assert_eq!(patches[1]["spec"]["upgrade"]["desiredUpdate"], "4.19.22");
    }

    #[tokio::test]
    async fn test_upgrade_requires_cluster_name() {
        let suite = suite(MockService::new(), &[]);
        let err = available_channels(&suite).await.unwrap_err();
        assert!(err.to_string().contains("HCP_CLUSTER_NAME"));
    }
}
