// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{Outcome, Suite};
use crate::constants::hub::{
    ADDON_AGENT_NAMESPACE, ADDON_NAME, EXTERNAL_DNS_OPERATOR, HYPERSHIFT_NAMESPACE, HYPERSHIFT_OPERATOR,
    INSTALL_JOB_PREFIX, S3_OIDC_SECRET_NAME,
};
use crate::constants::LOCAL_CLUSTER_NAME;
use crate::hub::operator::{deployment_exists, inject_secret_key, latest_pod, remove_secret_key};
use crate::types::resource::MANAGED_CLUSTER_ADDON;
use crate::types::ResourceRef;
use crate::wait::{poll_until, PollStep};
use anyhow::{bail, Context, Result};
use kube::ResourceExt;
use tracing::{info, warn};

const PROBE_KEY: &str = "test";
const PROBE_VALUE: &str = "12312132123====";

/// Changing the OIDC S3 secret makes the add-on agent re-run the hypershift
/// install job. The test key is removed again whatever the outcome.
pub async fn s3_secret_reinstall(suite: &Suite) -> Result<Outcome> {
    let client = suite.client();
    let namespace = suite.config.managed_cluster_name.as_str();

    let before = latest_pod(client, ADDON_AGENT_NAMESPACE, "")
        .await?
        .map(|pod| pod.name_any())
        .unwrap_or_default();
    info!("Latest pod in {} before the secret change: {:?}", ADDON_AGENT_NAMESPACE, before);

    let result = match inject_secret_key(client, namespace, S3_OIDC_SECRET_NAME, "region", PROBE_KEY, PROBE_VALUE).await
    {
        Ok(()) => wait_for_install_job(suite, &before).await,
        Err(e) => Err(anyhow::Error::from(e).context("failed to change the OIDC S3 secret")),
    };

    if let Err(e) = remove_secret_key(client, namespace, S3_OIDC_SECRET_NAME, PROBE_KEY).await {
        warn!("Failed to remove key {} from {}/{}: {}", PROBE_KEY, namespace, S3_OIDC_SECRET_NAME, e);
        result?;
        return Err(e).context("failed to restore the OIDC S3 secret");
    }

    result.map(|pod| {
        info!("Install job pod {} started after the secret change", pod);
        Outcome::Passed
    })
}

async fn wait_for_install_job(suite: &Suite, before: &str) -> Result<String> {
    let client = suite.client();
    let pod = poll_until("new hypershift install job pod", &suite.rotation_wait(), move || async move {
        let latest = latest_pod(client, ADDON_AGENT_NAMESPACE, "").await?.map(|p| p.name_any());
        Ok(match latest {
            Some(name) if name != before && name.starts_with(INSTALL_JOB_PREFIX) => PollStep::Ready(name),
            Some(name) => PollStep::Pending(format!("latest pod is {}", name)),
            None => PollStep::Pending("no pods".to_string()),
        })
    })
    .await?;
    Ok(pod)
}

/// The add-on is backed by the operator and external-dns deployments.
pub async fn status(suite: &Suite) -> Result<Outcome> {
    let client = suite.client();
    for deployment in [EXTERNAL_DNS_OPERATOR, HYPERSHIFT_OPERATOR] {
        if !deployment_exists(client, HYPERSHIFT_NAMESPACE, deployment).await? {
            bail!("deployment {}/{} does not exist", HYPERSHIFT_NAMESPACE, deployment);
        }
    }

    let addon = ResourceRef::namespaced(MANAGED_CLUSTER_ADDON, LOCAL_CLUSTER_NAME, ADDON_NAME);
    let present = suite
        .resources
        .exists(&addon)
        .await
        .with_context(|| format!("failed to read {}", addon))?;
    if !present {
        bail!("{} does not exist", addon);
    }
    info!("{} is backed by its deployments", addon);
    Ok(Outcome::Passed)
}
