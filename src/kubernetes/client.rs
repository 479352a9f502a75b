// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Hub cluster client creation

use crate::error::{E2eError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Create a Kubernetes client for the hub cluster.
///
/// An explicit kubeconfig path wins; otherwise the usual inference applies
/// (`KUBECONFIG`, `~/.kube/config`, in-cluster).
#[instrument]
pub async fn create_hub_client(kubeconfig: Option<&Path>) -> Result<Client> {
    let config = match kubeconfig {
        Some(path) => {
            info!("Using hub kubeconfig {}", path.display());
            let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
                E2eError::KubeconfigError(format!("Failed to read {}: {}", path.display(), e))
            })?;
            config_from_kubeconfig(&contents).await?
        }
        None => KConfig::infer()
            .await
            .map_err(|e| E2eError::KubeconfigError(format!("Failed to infer config: {}", e)))?,
    };
    debug!("Hub API server: {}", config.cluster_url);

    Client::try_from(config)
        .map_err(|e| E2eError::KubeconfigError(format!("Failed to create client: {}", e)))
}

/// Build a client config from a kubeconfig document, using its current context
async fn config_from_kubeconfig(kubeconfig: &str) -> Result<KConfig> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| E2eError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))?;

    KConfig::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
        .await
        .map_err(|e| E2eError::KubeconfigError(format!("Failed to create config: {}", e)))
}
