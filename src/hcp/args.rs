// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Argument lists for `hcp create cluster` and `hcp destroy cluster`.

use crate::error::{E2eError, Result};
use std::fmt;
use std::str::FromStr;

/// Hosted cluster platform.
///
/// Displays as the HostedCluster `spec.platform.type` value; the CLI takes
/// the lower-case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Aws,
    KubeVirt,
    Agent,
}

impl Platform {
    /// Platform as written on the `hcp` command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            Platform::Aws => "aws",
            Platform::KubeVirt => "kubevirt",
            Platform::Agent => "agent",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Aws => "AWS",
            Platform::KubeVirt => "KubeVirt",
            Platform::Agent => "Agent",
        }
    }

    /// Value of the `cloud` label on the imported ManagedCluster
    pub fn cloud_label(&self) -> &'static str {
        match self {
            Platform::Aws => "Amazon",
            _ => "Other",
        }
    }

    /// Platform extra var passed to the curator's Ansible hooks
    pub fn hook_platform(&self) -> String {
        format!("hc-{}", self.cli_name())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "aws" => Ok(Platform::Aws),
            "kubevirt" => Ok(Platform::KubeVirt),
            "agent" => Ok(Platform::Agent),
            _ => Err(E2eError::InvalidArgument(format!("unsupported platform {:?}", s))),
        }
    }
}

fn flag(args: &mut Vec<String>, name: &str, value: &str) {
    args.push(name.to_string());
    args.push(value.to_string());
}

fn create_tail(args: &mut Vec<String>, fips: bool, paused: bool) {
    if fips {
        args.push("--fips".to_string());
    }
    args.push("--generate-ssh".to_string());
    // Pause reconciliation so the curator install hooks can run first.
    if paused {
        flag(args, "--pausedUntil", "true");
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateAwsArgs {
    pub name: String,
    pub sts_creds: String,
    pub role_arn: String,
    pub pull_secret: String,
    pub base_domain: String,
    pub region: String,
    pub node_pool_replicas: String,
    pub namespace: String,
    pub instance_type: String,
    pub release_image: String,
    pub arch: String,
    pub fips: bool,
    pub paused: bool,
}

impl CreateAwsArgs {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "create".to_string(),
            "cluster".to_string(),
            Platform::Aws.cli_name().to_string(),
        ];
        flag(&mut args, "--name", &self.name);
        flag(&mut args, "--sts-creds", &self.sts_creds);
        flag(&mut args, "--role-arn", &self.role_arn);
        flag(&mut args, "--pull-secret", &self.pull_secret);
        flag(&mut args, "--base-domain", &self.base_domain);
        flag(&mut args, "--region", &self.region);
        flag(&mut args, "--node-pool-replicas", &self.node_pool_replicas);
        flag(&mut args, "--namespace", &self.namespace);
        flag(&mut args, "--instance-type", &self.instance_type);
        flag(&mut args, "--release-image", &self.release_image);
        flag(&mut args, "--arch", &self.arch);
        create_tail(&mut args, self.fips, self.paused);
        args
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateKubevirtArgs {
    pub name: String,
    pub pull_secret: String,
    pub memory: String,
    pub cores: String,
    pub node_pool_replicas: String,
    pub namespace: String,
    pub release_image: String,
    pub fips: bool,
    pub paused: bool,
}

impl CreateKubevirtArgs {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "create".to_string(),
            "cluster".to_string(),
            Platform::KubeVirt.cli_name().to_string(),
        ];
        flag(&mut args, "--name", &self.name);
        flag(&mut args, "--pull-secret", &self.pull_secret);
        flag(&mut args, "--memory", &self.memory);
        flag(&mut args, "--cores", &self.cores);
        flag(&mut args, "--node-pool-replicas", &self.node_pool_replicas);
        flag(&mut args, "--namespace", &self.namespace);
        flag(&mut args, "--infra-availability-policy", "SingleReplica");
        flag(&mut args, "--control-plane-availability-policy", "SingleReplica");
        flag(&mut args, "--release-image", &self.release_image);
        create_tail(&mut args, self.fips, self.paused);
        args
    }
}

#[derive(Debug, Clone)]
pub struct DestroyArgs {
    pub platform: Platform,
    pub name: String,
    pub namespace: String,
    /// Name of the cloud credentials secret. Only passed for AWS.
    pub secret_creds: Option<String>,
}

impl DestroyArgs {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "destroy".to_string(),
            "cluster".to_string(),
            self.platform.cli_name().to_string(),
        ];
        flag(&mut args, "--name", &self.name);
        flag(&mut args, "--namespace", &self.namespace);
        if self.platform == Platform::Aws {
            if let Some(secret) = &self.secret_creds {
                flag(&mut args, "--secret-creds", secret);
            }
        }
        args.push("--destroy-cloud-resources".to_string());
        args
    }
}
