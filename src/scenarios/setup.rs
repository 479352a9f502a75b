// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{Outcome, Suite};
use crate::constants::hub::{ADDON_MANAGER_NAME, ADDON_MANAGER_NAMESPACE, S3_OIDC_BUCKET, S3_OIDC_REGION};
use crate::hub::operator::{
    create_oidc_secret, deployment_exists, wait_for_hub_addon_available, wait_for_operator_healthy,
};
use crate::wait::{poll_until, PollStep};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Hub prerequisites every other scenario relies on.
pub async fn run(suite: &Suite) -> Result<Outcome> {
    let version = suite.cli.version().await.context("hcp CLI is not usable")?;
    info!("hcp version: {}", version.output.trim());

    wait_for_operator_healthy(suite.client(), &suite.long_wait())
        .await
        .context("hypershift operator is not healthy")?;

    wait_for_addon_manager(suite).await?;

    wait_for_hub_addon_available(&suite.resources, &suite.long_wait())
        .await
        .context("hypershift-addon is not available on the hub")?;

    let credentials = &suite.config.s3_credentials;
    if credentials.access_key_id.is_empty() || credentials.secret_access_key.is_empty() {
        warn!("S3 credentials are empty, the OIDC secret will not be usable for AWS clusters");
    }
    let namespace = &suite.config.managed_cluster_name;
    let created = create_oidc_secret(suite.client(), namespace, S3_OIDC_BUCKET, S3_OIDC_REGION, credentials)
        .await
        .context("failed to create the OIDC S3 secret")?;
    if !created {
        info!("Keeping the existing OIDC S3 secret in {}", namespace);
    }

    Ok(Outcome::Passed)
}

async fn wait_for_addon_manager(suite: &Suite) -> Result<()> {
    let client = suite.client();
    poll_until("hypershift add-on manager deployment", &suite.long_wait(), move || async move {
        Ok(
            if deployment_exists(client, ADDON_MANAGER_NAMESPACE, ADDON_MANAGER_NAME).await? {
                PollStep::Ready(())
            } else {
                PollStep::Pending("deployment not found".to_string())
            },
        )
    })
    .await
    .context("hypershift add-on manager is not installed")?;
    info!("Add-on manager {}/{} is installed", ADDON_MANAGER_NAMESPACE, ADDON_MANAGER_NAME);
    Ok(())
}
