// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Drives install, upgrade and destroy of a hosted cluster, optionally running
/// Ansible hooks before and after each step.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "cluster.open-cluster-management.io",
    version = "v1beta1",
    kind = "ClusterCurator"
)]
#[kube(namespaced)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCuratorSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_curation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install: Option<CurationHooks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade: Option<UpgradeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destroy: Option<CurationHooks>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurationHooks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tower_auth_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prehook: Vec<Hook>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub posthook: Vec<Hook>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tower_auth_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prehook: Vec<Hook>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub posthook: Vec<Hook>,
}

/// An Ansible job template to launch. `extra_vars` keeps its snake_case key
/// on the wire.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
pub struct Hook {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_vars: BTreeMap<String, String>,
}

impl Hook {
    pub fn new(name: &str, hook: HookPhase, platform: &str) -> Self {
        let mut extra_vars = BTreeMap::new();
        extra_vars.insert("hook".to_string(), hook.to_string());
        extra_vars.insert("platform".to_string(), platform.to_string());
        Self {
            name: name.to_string(),
            extra_vars,
        }
    }
}

/// Which side of a curation step an Ansible hook runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Pre,
    Post,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::Pre => write!(f, "pre"),
            HookPhase::Post => write!(f, "post"),
        }
    }
}

/// Value of `spec.desiredCuration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curation {
    Install,
    Upgrade,
    Destroy,
}

impl fmt::Display for Curation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curation::Install => write!(f, "install"),
            Curation::Upgrade => write!(f, "upgrade"),
            Curation::Destroy => write!(f, "destroy"),
        }
    }
}

/// Value of `spec.upgrade.upgradeType`. An unset type upgrades both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeType {
    ControlPlane,
    NodePools,
}

impl fmt::Display for UpgradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeType::ControlPlane => write!(f, "ControlPlane"),
            UpgradeType::NodePools => write!(f, "NodePools"),
        }
    }
}

impl FromStr for UpgradeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ControlPlane" => Ok(UpgradeType::ControlPlane),
            "NodePools" => Ok(UpgradeType::NodePools),
            other => Err(format!(
                "unknown upgrade type '{}', expected ControlPlane or NodePools",
                other
            )),
        }
    }
}

/// The parts of an AnsibleJob the suite reads.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnsibleJobView {
    #[serde(default)]
    pub spec: AnsibleJobSpec,
    #[serde(default)]
    pub status: AnsibleJobStatus,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct AnsibleJobSpec {
    #[serde(default)]
    pub extra_vars: BTreeMap<String, serde_json::Value>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnsibleJobStatus {
    pub is_finished: Option<bool>,
}

impl AnsibleJobView {
    pub fn hook(&self) -> Option<&str> {
        self.spec.extra_vars.get("hook").and_then(|v| v.as_str())
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished.unwrap_or(false)
    }

    /// Whether this is the finished job of the given hook phase
    pub fn finished_hook(&self, phase: HookPhase) -> bool {
        self.is_finished() && self.hook() == Some(phase.to_string().as_str())
    }
}
