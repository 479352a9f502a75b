// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{Outcome, Suite};
use crate::config::Config;
use crate::constants::conditions::{CURATOR_JOB, INIT_CONTAINER_DONE, PREHOOK_JOB, PROVISIONING_JOB};
use crate::constants::poll;
use crate::hcp::{generate_cluster_name, CreateAwsArgs, CreateKubevirtArgs, Platform};
use crate::hub::curator::{
    apply_curator, apply_tower_secret, delete_curator, full_curator, job_finished, wait_for_curator_condition,
    wait_for_hook, TOWER_SECRET_NAME,
};
use crate::hub::hosted_clusters::wait_for_control_plane_available;
use crate::hub::managed_clusters::{
    expected_addons, expected_annotations, expected_labels, managed_cluster_ref, wait_for_addons_available,
    wait_for_imported,
};
use crate::hub::operator::is_acm_installed;
use crate::hub::{wait_for_annotations, wait_for_labels};
use crate::types::curator::{Curation, HookPhase};
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::info;

pub async fn create_aws(suite: &Suite) -> Result<Outcome> {
    let config = &suite.config;
    let args = CreateAwsArgs {
        name: generate_cluster_name(&config.cluster_name_prefix),
        sts_creds: Config::require(&config.aws_sts_creds, "AWS_STS_CREDS_FILE_PATH")?.to_string(),
        role_arn: Config::require(&config.aws_role_arn, "AWS_ROLE_ARN")?.to_string(),
        pull_secret: config.pull_secret.clone(),
        base_domain: config.base_domain.clone(),
        region: config.region.clone(),
        node_pool_replicas: config.node_pool_replicas.clone(),
        namespace: config.namespace.clone(),
        instance_type: config.instance_type.clone(),
        release_image: config.release_image.clone(),
        arch: config.arch.clone(),
        fips: config.fips_enabled,
        paused: config.curator_enabled,
    };

    info!("Creating AWS hosted cluster {}", args.name);
    suite
        .cli
        .run(&args.to_args(), poll::SCENARIO_TIMEOUT)
        .await
        .context("hcp create cluster aws failed")?;
    wait_for_provisioned(suite, &args.name, Platform::Aws).await?;
    Ok(Outcome::Passed)
}

pub async fn create_kubevirt(suite: &Suite) -> Result<Outcome> {
    let config = &suite.config;
    let args = CreateKubevirtArgs {
        name: generate_cluster_name(&config.cluster_name_prefix),
        pull_secret: config.pull_secret.clone(),
        memory: config.kubevirt_memory.clone(),
        cores: config.kubevirt_cores.clone(),
        node_pool_replicas: config.node_pool_replicas.clone(),
        namespace: config.namespace.clone(),
        release_image: config.release_image.clone(),
        fips: config.fips_enabled,
        paused: config.curator_enabled,
    };

    info!("Creating KubeVirt hosted cluster {}", args.name);
    suite
        .cli
        .run(&args.to_args(), poll::SCENARIO_TIMEOUT)
        .await
        .context("hcp create cluster kubevirt failed")?;
    wait_for_provisioned(suite, &args.name, Platform::KubeVirt).await?;
    Ok(Outcome::Passed)
}

/// Follow a freshly created hosted cluster until it is imported into the
/// hub with its add-ons available. With the curator enabled the cluster
/// was created paused and the curator drives the install.
pub(crate) async fn wait_for_provisioned(suite: &Suite, name: &str, platform: Platform) -> Result<()> {
    let config = &suite.config;
    let resources = &suite.resources;
    let namespace = config.namespace.as_str();
    let start = Instant::now();

    if config.curator_enabled {
        start_install_curation(suite, name, platform).await?;

        wait_for_hook(resources, name, namespace, HookPhase::Pre, &suite.long_wait())
            .await
            .context("prehook AnsibleJob did not finish")?;
        wait_for_curator_condition(
            resources,
            name,
            namespace,
            &job_finished(PREHOOK_JOB, INIT_CONTAINER_DONE),
            &suite.long_wait(),
        )
        .await?;
        info!("Prehook finished after {:?}", start.elapsed());
    }

    wait_for_control_plane_available(resources, name, namespace, &suite.long_wait())
        .await
        .context("hosted control plane did not become available")?;
    info!("Hosted control plane available after {:?}", start.elapsed());

    if config.curator_enabled {
        wait_for_curator_condition(
            resources,
            name,
            namespace,
            &job_finished(PROVISIONING_JOB, "-provision"),
            &suite.long_wait(),
        )
        .await?;
        wait_for_hook(resources, name, namespace, HookPhase::Post, &suite.long_wait())
            .await
            .context("posthook AnsibleJob did not finish")?;
        wait_for_curator_condition(
            resources,
            name,
            namespace,
            &job_finished(CURATOR_JOB, "DesiredCuration: install"),
            &suite.long_wait(),
        )
        .await?;
        info!("Curator install finished after {:?}", start.elapsed());
    }

    wait_for_imported(resources, name, &suite.long_wait())
        .await
        .context("managed cluster was not imported")?;
    info!("Imported after {:?}", start.elapsed());

    let addons = expected_addons(is_acm_installed(resources).await?);
    wait_for_addons_available(resources, name, addons, &suite.long_wait())
        .await
        .context("managed cluster add-ons are not available")?;

    let cluster = managed_cluster_ref(name);
    wait_for_labels(resources, &cluster, &expected_labels(name, platform), &suite.short_wait())
        .await
        .context("managed cluster labels are wrong")?;
    wait_for_annotations(resources, &cluster, &expected_annotations(), &suite.short_wait())
        .await
        .context("managed cluster annotations are wrong")?;

    info!("Hosted cluster {} ready in {:?}", name, start.elapsed());
    Ok(())
}

/// Recreate the curator for `name` and ask it to install the paused cluster.
async fn start_install_curation(suite: &Suite, name: &str, platform: Platform) -> Result<()> {
    let config = &suite.config;
    let namespace = config.namespace.as_str();

    apply_tower_secret(suite.client(), TOWER_SECRET_NAME, namespace, &config.aap_host, &config.aap_token).await?;
    delete_curator(&suite.resources, name, namespace).await?;
    let curator = full_curator(
        name,
        namespace,
        Some(Curation::Install),
        &platform.hook_platform(),
        TOWER_SECRET_NAME,
    );
    apply_curator(&suite.resources, &curator)
        .await
        .context("failed to create the ClusterCurator")?;
    Ok(())
}
