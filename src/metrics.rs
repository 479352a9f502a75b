// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Minimal Prometheus HTTP API client for instant vector queries.

use crate::error::{E2eError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};
use url::Url;

/// Add-on health gauges that must read 0 on a healthy hub
pub const HEALTH_GAUGES: &[&str] = &[
    "mce_hs_addon_install_failure_gauge",
    "mce_hs_addon_install_failing_gauge_bool",
    "mce_hs_addon_failed_to_start_bool",
    "mce_hs_addon_hypershift_operator_degraded_bool",
];

pub const TOTAL_HOSTED_CONTROL_PLANES: &str = "mce_hs_addon_total_hosted_control_planes_gauge";

/// Query for the number of hosted clusters of one platform
pub fn hosted_clusters_query(platform: &str) -> String {
    format!("hypershift_hostedclusters{{platform=\"{}\"}}", platform)
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    status: String,
    data: Option<QueryData>,
    #[serde(default)]
    warnings: Vec<String>,
    error_type: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    result_type: String,
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Deserialize, Debug)]
struct RawSample {
    #[serde(default)]
    metric: BTreeMap<String, String>,
    value: (serde_json::Value, String),
}

/// One element of an instant vector
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub metric: BTreeMap<String, String>,
    pub value: f64,
}

/// Parse a `/api/v1/query` response body that must hold a vector.
pub fn parse_vector(body: &str) -> Result<Vec<Sample>> {
    let response: QueryResponse =
        serde_json::from_str(body).map_err(|e| E2eError::MetricsError(format!("invalid response: {}", e)))?;

    for warning in &response.warnings {
        warn!("Prometheus warning: {}", warning);
    }
    if response.status != "success" {
        return Err(E2eError::MetricsError(format!(
            "query failed ({}): {}",
            response.error_type.unwrap_or_default(),
            response.error.unwrap_or_default()
        )));
    }

    let data = response
        .data
        .ok_or_else(|| E2eError::MetricsError("response has no data".to_string()))?;
    if data.result_type != "vector" {
        return Err(E2eError::MetricsError(format!(
            "expected a vector result, got {}",
            data.result_type
        )));
    }

    let raw: Vec<RawSample> = serde_json::from_value(data.result)
        .map_err(|e| E2eError::MetricsError(format!("invalid vector: {}", e)))?;
    raw.into_iter()
        .map(|s| {
            let value = s
                .value
                .1
                .parse::<f64>()
                .map_err(|e| E2eError::MetricsError(format!("invalid sample value {:?}: {}", s.value.1, e)))?;
            Ok(Sample {
                metric: s.metric,
                value,
            })
        })
        .collect()
}

/// Value of the first sample.
pub fn first_value(samples: &[Sample], query: &str) -> Result<f64> {
    samples
        .first()
        .map(|s| s.value)
        .ok_or_else(|| E2eError::MetricsError(format!("query {} returned no samples", query)))
}

pub fn assert_sample(samples: &[Sample], query: &str, expected: f64) -> Result<()> {
    let value = first_value(samples, query)?;
    if value != expected {
        return Err(E2eError::AssertionFailed(format!(
            "{} is {}, expected {}",
            query, value, expected
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct PrometheusClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl PrometheusClient {
    /// `insecure` skips TLS certificate verification, which the default
    /// monitoring route on a test hub usually needs.
    pub fn new(base: &str, token: Option<String>, insecure: bool) -> Result<Self> {
        let mut base =
            Url::parse(base).map_err(|e| E2eError::InvalidArgument(format!("Prometheus URL {}: {}", base, e)))?;
        // Relative joins replace the last segment unless the path ends with a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self { http, base, token })
    }

    pub fn query_url(&self, query: &str) -> Result<Url> {
        let mut url = self
            .base
            .join("api/v1/query")
            .map_err(|e| E2eError::InvalidArgument(format!("Prometheus URL: {}", e)))?;
        url.query_pairs_mut().append_pair("query", query);
        Ok(url)
    }

    #[instrument(skip(self))]
    pub async fn query(&self, query: &str) -> Result<Vec<Sample>> {
        let mut request = self.http.get(self.query_url(query)?);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let body = request.send().await?.text().await?;
        let samples = parse_vector(&body)?;
        debug!("{} returned {} sample(s)", query, samples.len());
        Ok(samples)
    }
}
