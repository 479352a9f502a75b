// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use serde::Deserialize;

/// The parts of a HostedCluster the suite reads.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostedClusterView {
    #[serde(default)]
    pub spec: HostedClusterSpec,
    #[serde(default)]
    pub status: Option<HostedClusterStatus>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostedClusterSpec {
    pub platform: Option<PlatformSpec>,
    pub release: Option<ReleaseSpec>,
    pub channel: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSpec {
    #[serde(rename = "type")]
    pub platform_type: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSpec {
    pub image: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct HostedClusterStatus {
    pub version: Option<ClusterVersionStatus>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterVersionStatus {
    pub desired: Option<DesiredRelease>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DesiredRelease {
    #[serde(default)]
    pub channels: Vec<String>,
}

impl HostedClusterView {
    pub fn platform_type(&self) -> Option<&str> {
        self.spec
            .platform
            .as_ref()
            .and_then(|p| p.platform_type.as_deref())
    }

    pub fn release_image(&self) -> Option<&str> {
        self.spec.release.as_ref().and_then(|r| r.image.as_deref())
    }

    pub fn channel(&self) -> Option<&str> {
        self.spec.channel.as_deref()
    }

    /// Channels the cluster version operator reports as valid upgrade targets
    pub fn available_channels(&self) -> Vec<String> {
        self.status
            .as_ref()
            .and_then(|s| s.version.as_ref())
            .and_then(|v| v.desired.as_ref())
            .map(|d| d.channels.clone())
            .unwrap_or_default()
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolView {
    #[serde(default)]
    pub spec: NodePoolSpec,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolSpec {
    pub cluster_name: Option<String>,
    pub release: Option<ReleaseSpec>,
}

impl NodePoolView {
    pub fn belongs_to(&self, hosted_cluster: &str) -> bool {
        self.spec.cluster_name.as_deref() == Some(hosted_cluster)
    }

    pub fn release_image(&self) -> Option<&str> {
        self.spec.release.as_ref().and_then(|r| r.image.as_deref())
    }
}

/// MultiClusterHub and MultiClusterEngine share this shape.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct OperatorInstallView {
    #[serde(default)]
    pub spec: OperatorInstallSpec,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct OperatorInstallSpec {
    pub target_namespace: Option<String>,
}
