// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ClusterCurator lifecycle and the Ansible hooks it runs.

use crate::constants::conditions::{CURRENT_ANSIBLE_JOB, JOB_HAS_FINISHED, STATUS_TRUE};
use crate::constants::FIELD_MANAGER;
use crate::error::{E2eError, Result};
use crate::kubernetes::ResourceClient;
use crate::types::condition::{conditions_of, find_condition};
use crate::types::curator::{
    AnsibleJobView, ClusterCurator, ClusterCuratorSpec, Curation, CurationHooks, Hook, HookPhase, UpgradeSpec,
    UpgradeType,
};
use crate::types::resource::{ANSIBLE_JOB, CLUSTER_CURATOR};
use crate::types::{decode, ResourceRef};
use crate::wait::{poll_until, wait_for_condition, ConditionExpectation, FetchErrorPolicy, PollSettings, PollStep};
use k8s_openapi::api::core::v1::Secret;
use kube::api::{ObjectMeta, Patch, PatchParams};
use kube::{Api, Client};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Name of the Ansible Tower credentials secret in the cluster namespace
pub const TOWER_SECRET_NAME: &str = "aap-tower-cred";

/// Job template the curator hooks launch on Ansible Tower
pub const HOOK_TEMPLATE: &str = "Demo Job Template";

pub fn curator_ref(name: &str, namespace: &str) -> ResourceRef {
    ResourceRef::namespaced(CLUSTER_CURATOR, namespace, name)
}

fn hooks(platform: &str, tower_secret: &str) -> CurationHooks {
    CurationHooks {
        tower_auth_secret: Some(tower_secret.to_string()),
        prehook: vec![Hook::new(HOOK_TEMPLATE, HookPhase::Pre, platform)],
        posthook: vec![Hook::new(HOOK_TEMPLATE, HookPhase::Post, platform)],
    }
}

/// A curator running pre and post hooks for install, upgrade and destroy.
///
/// `platform` is the hook platform var, e.g. `hc-aws`.
pub fn full_curator(
    name: &str,
    namespace: &str,
    desired_curation: Option<Curation>,
    platform: &str,
    tower_secret: &str,
) -> ClusterCurator {
    let hooks = hooks(platform, tower_secret);
    let spec = ClusterCuratorSpec {
        desired_curation: desired_curation.map(|c| c.to_string()),
        install: Some(hooks.clone()),
        upgrade: Some(UpgradeSpec {
            tower_auth_secret: hooks.tower_auth_secret.clone(),
            prehook: hooks.prehook.clone(),
            posthook: hooks.posthook.clone(),
            ..Default::default()
        }),
        destroy: Some(hooks),
    };
    with_namespace(ClusterCurator::new(name, spec), namespace)
}

/// A curator with no hooks and no Tower secret, for upgrades only.
pub fn minimal_curator(name: &str, namespace: &str) -> ClusterCurator {
    let spec = ClusterCuratorSpec {
        upgrade: Some(UpgradeSpec::default()),
        ..Default::default()
    };
    with_namespace(ClusterCurator::new(name, spec), namespace)
}

fn with_namespace(mut curator: ClusterCurator, namespace: &str) -> ClusterCurator {
    curator.metadata.namespace = Some(namespace.to_string());
    curator
}

/// Create or update a curator.
#[instrument(skip(resources, curator))]
pub async fn apply_curator(resources: &ResourceClient, curator: &ClusterCurator) -> Result<()> {
    let name = curator.metadata.name.as_deref().unwrap_or_default();
    let namespace = curator.metadata.namespace.as_deref().unwrap_or_default();
    if name.is_empty() || namespace.is_empty() {
        return Err(E2eError::InvalidArgument(
            "cluster curator name and namespace must be set".to_string(),
        ));
    }
    resources.apply(&curator_ref(name, namespace), curator).await?;
    info!("Applied ClusterCurator {}/{}", namespace, name);
    Ok(())
}

pub async fn set_desired_curation(
    resources: &ResourceClient,
    name: &str,
    namespace: &str,
    curation: Curation,
) -> Result<()> {
    info!("Setting desiredCuration of {}/{} to {}", namespace, name, curation);
    resources
        .merge_patch(
            &curator_ref(name, namespace),
            json!({"spec": {"desiredCuration": curation.to_string()}}),
        )
        .await?;
    Ok(())
}

pub async fn set_upgrade_channel(resources: &ResourceClient, name: &str, namespace: &str, channel: &str) -> Result<()> {
    if channel.is_empty() {
        return Err(E2eError::InvalidArgument("upgrade channel must be non-empty".to_string()));
    }
    info!("Setting upgrade channel of {}/{} to {}", namespace, name, channel);
    resources
        .merge_patch(
            &curator_ref(name, namespace),
            json!({"spec": {"upgrade": {"channel": channel}}}),
        )
        .await?;
    Ok(())
}

pub async fn set_upgrade_target(
    resources: &ResourceClient,
    name: &str,
    namespace: &str,
    desired_update: &str,
    upgrade_type: UpgradeType,
) -> Result<()> {
    if desired_update.is_empty() {
        return Err(E2eError::InvalidArgument("desired update must be non-empty".to_string()));
    }
    info!(
        "Setting upgrade of {}/{} to {} ({})",
        namespace, name, desired_update, upgrade_type
    );
    resources
        .merge_patch(
            &curator_ref(name, namespace),
            json!({"spec": {"upgrade": {
                "desiredUpdate": desired_update,
                "upgradeType": upgrade_type.to_string(),
            }}}),
        )
        .await?;
    Ok(())
}

/// Delete a curator. A curator that does not exist is not an error.
pub async fn delete_curator(resources: &ResourceClient, name: &str, namespace: &str) -> Result<()> {
    if resources.delete(&curator_ref(name, namespace)).await? {
        info!("Deleted ClusterCurator {}/{}", namespace, name);
    } else {
        debug!("ClusterCurator {}/{} already absent", namespace, name);
    }
    Ok(())
}

/// Expectation for a curator job condition that has finished.
pub fn job_finished(condition_type: &str, message: &str) -> ConditionExpectation {
    ConditionExpectation::new(condition_type, STATUS_TRUE)
        .with_reason(JOB_HAS_FINISHED)
        .with_message(message)
}

pub async fn wait_for_curator_condition(
    resources: &ResourceClient,
    name: &str,
    namespace: &str,
    expectation: &ConditionExpectation,
    settings: &PollSettings,
) -> Result<()> {
    info!("Waiting for ClusterCurator {}/{} condition {}", namespace, name, expectation);
    wait_for_condition(resources, &curator_ref(name, namespace), expectation, settings).await?;
    Ok(())
}

/// The AnsibleJob named by the curator's `current-ansiblejob` condition.
///
/// `None` while the curator has not started a job yet or the job object
/// does not exist.
pub async fn current_ansible_job(
    resources: &ResourceClient,
    name: &str,
    namespace: &str,
) -> Result<Option<(String, AnsibleJobView)>> {
    let curator = resources.get(&curator_ref(name, namespace)).await?;
    let conditions = conditions_of(&curator)?;
    let Some(job_name) = find_condition(&conditions, CURRENT_ANSIBLE_JOB)
        .map(|c| c.message.clone())
        .filter(|m| !m.is_empty())
    else {
        return Ok(None);
    };

    match resources
        .get_opt(&ResourceRef::namespaced(ANSIBLE_JOB, namespace, &job_name))
        .await?
    {
        Some(obj) => Ok(Some((job_name, decode(&obj)?))),
        None => Ok(None),
    }
}

/// Wait until the curator's current AnsibleJob is the `phase` hook and has
/// finished.
#[instrument(skip(resources, settings))]
pub async fn wait_for_hook(
    resources: &ResourceClient,
    name: &str,
    namespace: &str,
    phase: HookPhase,
    settings: &PollSettings,
) -> Result<()> {
    let description = format!("{} hook AnsibleJob of ClusterCurator {}/{}", phase, namespace, name);
    let policy = settings.fetch_errors;

    poll_until(&description, settings, move || async move {
        let current = match current_ansible_job(resources, name, namespace).await {
            Ok(current) => current,
            Err(e) if e.is_not_found() => return Ok(PollStep::Pending("curator not found".to_string())),
            Err(e @ E2eError::MalformedResource { .. }) => return Err(e),
            Err(e) => {
                return match policy {
                    FetchErrorPolicy::Retry => Ok(PollStep::Pending(format!("fetch failed: {}", e))),
                    FetchErrorPolicy::FailFast => Err(e),
                }
            }
        };

        Ok(match current {
            Some((job, view)) if view.finished_hook(phase) => {
                info!("AnsibleJob {} for the {} hook finished", job, phase);
                PollStep::Ready(())
            }
            Some((job, view)) => PollStep::Pending(format!(
                "AnsibleJob {} hook={:?} isFinished={}",
                job,
                view.hook(),
                view.is_finished()
            )),
            None => PollStep::Pending("no current AnsibleJob".to_string()),
        })
    })
    .await
}

/// The Tower credentials secret curator hooks authenticate with
pub fn tower_secret(name: &str, namespace: &str, host: &str, token: &str) -> Secret {
    let labels = BTreeMap::from([
        ("cluster.open-cluster-management.io/type".to_string(), "ans".to_string()),
        ("cluster.open-cluster-management.io/credentials".to_string(), String::new()),
    ]);
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        type_: Some("Opaque".to_string()),
        string_data: Some(BTreeMap::from([
            ("host".to_string(), host.to_string()),
            ("token".to_string(), token.to_string()),
        ])),
        ..Default::default()
    }
}

/// Create or update the Tower credentials secret. Host and token are both
/// required.
#[instrument(skip(client, token))]
pub async fn apply_tower_secret(client: &Client, name: &str, namespace: &str, host: &str, token: &str) -> Result<()> {
    if host.is_empty() || token.is_empty() {
        return Err(E2eError::MissingSetting(
            "Ansible Tower host and token (AAP_HOST / AAP_TOKEN)".to_string(),
        ));
    }
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);
    let params = PatchParams::apply(FIELD_MANAGER).force();
    secrets
        .patch(name, &params, &Patch::Apply(&tower_secret(name, namespace, host, token)))
        .await?;
    info!("Applied Ansible Tower secret {}/{}", namespace, name);
    Ok(())
}
