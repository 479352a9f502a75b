// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{Outcome, Suite};
use crate::constants::hub::{
    ACM_SERVICE_MONITOR, ADDON_AGENT_NAMESPACE, HYPERSHIFT_NAMESPACE, MCE_SERVICE_MONITOR, MONITORING_NAMESPACE,
};
use crate::constants::labels::CLUSTER_MONITORING;
use crate::hcp::Platform;
use crate::hub::hosted_clusters::count_by_platform;
use crate::kubernetes::{namespace_labels, ResourceClient};
use crate::metrics::{assert_sample, hosted_clusters_query, PrometheusClient, HEALTH_GAUGES, TOTAL_HOSTED_CONTROL_PLANES};
use crate::types::resource::SERVICE_MONITOR;
use crate::types::ResourceRef;
use anyhow::{bail, Context, Result};
use kube::Client;
use std::collections::BTreeMap;
use tracing::info;

/// Where each add-on service monitor must and must not be deployed
const SERVICE_MONITOR_PLACEMENT: &[(&str, &str, bool)] = &[
    (MONITORING_NAMESPACE, MCE_SERVICE_MONITOR, false),
    (MONITORING_NAMESPACE, ACM_SERVICE_MONITOR, false),
    (HYPERSHIFT_NAMESPACE, MCE_SERVICE_MONITOR, false),
    (HYPERSHIFT_NAMESPACE, ACM_SERVICE_MONITOR, false),
    (ADDON_AGENT_NAMESPACE, MCE_SERVICE_MONITOR, true),
    (ADDON_AGENT_NAMESPACE, ACM_SERVICE_MONITOR, false),
];

pub async fn run(suite: &Suite) -> Result<Outcome> {
    check_service_monitors(&suite.resources).await?;
    check_monitoring_labels(suite.client()).await?;

    let config = &suite.config;
    let Some(url) = config.prometheus_url.as_deref() else {
        return Ok(Outcome::skipped(
            "PROMETHEUS_URL is not set, Prometheus queries were not run",
        ));
    };
    let prometheus = PrometheusClient::new(url, config.prometheus_token.clone(), config.prometheus_insecure)?;

    for gauge in HEALTH_GAUGES {
        let samples = prometheus.query(gauge).await?;
        assert_sample(&samples, gauge, 0.0)?;
        info!("{} is 0", gauge);
    }

    let counts = count_by_platform(&suite.resources).await?;
    info!("Hosted clusters per platform: {:?}", counts);
    for (query, expected) in expected_counts(&counts) {
        let samples = prometheus.query(&query).await?;
        assert_sample(&samples, &query, expected).context("Prometheus disagrees with the hub")?;
        info!("{} is {}", query, expected);
    }

    Ok(Outcome::Passed)
}

/// Only the MCE service monitor exists, and only in the add-on agent namespace.
pub async fn check_service_monitors(resources: &ResourceClient) -> Result<()> {
    for (namespace, name, expected) in SERVICE_MONITOR_PLACEMENT {
        let present = resources
            .exists(&ResourceRef::namespaced(SERVICE_MONITOR, namespace, name))
            .await?;
        if present != *expected {
            bail!(
                "ServiceMonitor {}/{} should {}exist",
                namespace,
                name,
                if *expected { "" } else { "not " }
            );
        }
    }
    info!("Service monitors are deployed to the expected namespaces");
    Ok(())
}

pub async fn check_monitoring_labels(client: &Client) -> Result<()> {
    for namespace in [HYPERSHIFT_NAMESPACE, ADDON_AGENT_NAMESPACE] {
        let labels = namespace_labels(client, namespace).await?;
        if labels.get(CLUSTER_MONITORING).map(String::as_str) != Some("true") {
            bail!("namespace {} is missing label {}=true", namespace, CLUSTER_MONITORING);
        }
    }
    Ok(())
}

/// Prometheus queries and the values the hub's hosted clusters imply
pub fn expected_counts(counts: &BTreeMap<String, usize>) -> Vec<(String, f64)> {
    let total: usize = counts.values().sum();
    let mut expected = vec![(TOTAL_HOSTED_CONTROL_PLANES.to_string(), total as f64)];
    for platform in [Platform::KubeVirt, Platform::Agent, Platform::Aws] {
        let count = counts.get(platform.as_str()).copied().unwrap_or(0);
        expected.push((hosted_clusters_query(platform.as_str()), count as f64));
    }
    expected
}
