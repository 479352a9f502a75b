// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{DestroyOpts, Outcome, Suite};
use crate::constants::conditions::{INIT_CONTAINER_DONE, PREHOOK_JOB, UNINSTALLING_JOB};
use crate::constants::poll;
use crate::hcp::{DestroyArgs, Platform};
use crate::hub::curator::{job_finished, set_desired_curation, wait_for_curator_condition, wait_for_hook};
use crate::hub::hosted_clusters::{list_hosted_clusters, wait_for_destroyed};
use crate::hub::managed_clusters::wait_for_detached;
use crate::types::curator::{Curation, HookPhase};
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::info;

pub async fn run(suite: &Suite, platform: Platform, opts: &DestroyOpts) -> Result<Outcome> {
    if opts.all {
        destroy_all(suite, platform).await
    } else {
        destroy_one(suite, platform).await
    }
}

fn destroy_args(suite: &Suite, platform: Platform, name: &str, namespace: &str) -> DestroyArgs {
    DestroyArgs {
        platform,
        name: name.to_string(),
        namespace: namespace.to_string(),
        secret_creds: Some(suite.config.secret_creds_name.clone()),
    }
}

/// Destroy every hosted cluster of `platform`. All destroy commands run
/// before any removal is verified.
async fn destroy_all(suite: &Suite, platform: Platform) -> Result<Outcome> {
    let start = Instant::now();
    let clusters = list_hosted_clusters(&suite.resources, Some(platform)).await?;
    if clusters.is_empty() {
        return Ok(Outcome::skipped(format!("no {} hosted clusters found on the hub", platform)));
    }

    for cluster in &clusters {
        info!("Destroying {} hosted cluster {}/{}", platform, cluster.namespace, cluster.name);
        let args = destroy_args(suite, platform, &cluster.name, &cluster.namespace);
        suite
            .cli
            .run(&args.to_args(), poll::SCENARIO_TIMEOUT)
            .await
            .with_context(|| format!("hcp destroy cluster failed for {}", cluster.name))?;
    }

    for cluster in &clusters {
        wait_for_destroyed(&suite.resources, &cluster.name, &cluster.namespace, &suite.long_wait()).await?;
        wait_for_detached(&suite.resources, &cluster.name, &suite.long_wait()).await?;
    }

    info!("Destroyed {} hosted cluster(s) in {:?}", clusters.len(), start.elapsed());
    Ok(Outcome::Passed)
}

/// Destroy `HCP_CLUSTER_NAME`. KubeVirt clusters are destroyed through
/// their curator when it is enabled.
async fn destroy_one(suite: &Suite, platform: Platform) -> Result<Outcome> {
    let config = &suite.config;
    let name = config.cluster_name.as_str();
    if name.is_empty() {
        return Ok(Outcome::skipped("HCP_CLUSTER_NAME is not set, nothing to destroy"));
    }
    let namespace = config.namespace.as_str();
    let resources = &suite.resources;
    let curated = config.curator_enabled && platform == Platform::KubeVirt;
    let start = Instant::now();

    if curated {
        set_desired_curation(resources, name, namespace, Curation::Destroy).await?;
        wait_for_curator_condition(
            resources,
            name,
            namespace,
            &job_finished(PREHOOK_JOB, INIT_CONTAINER_DONE),
            &suite.long_wait(),
        )
        .await?;
    } else {
        let args = destroy_args(suite, platform, name, namespace);
        suite
            .cli
            .run(&args.to_args(), poll::SCENARIO_TIMEOUT)
            .await
            .context("hcp destroy cluster failed")?;
    }

    wait_for_destroyed(resources, name, namespace, &suite.long_wait()).await?;

    if curated {
        wait_for_curator_condition(
            resources,
            name,
            namespace,
            &job_finished(UNINSTALLING_JOB, "-uninstall"),
            &suite.long_wait(),
        )
        .await?;
        wait_for_hook(resources, name, namespace, HookPhase::Post, &suite.long_wait())
            .await
            .context("posthook AnsibleJob did not finish")?;
    }

    wait_for_detached(resources, name, &suite.long_wait()).await?;
    info!("Destroyed hosted cluster {} in {:?}", name, start.elapsed());
    Ok(Outcome::Passed)
}
