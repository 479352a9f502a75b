// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Suite configuration: an optional YAML options file overlaid by
//! environment variables.

use crate::constants::{DEFAULT_CLUSTER_NAME_PREFIX, DEFAULT_HOSTED_CLUSTER_NAMESPACE, HCP_CLI_NAME, LOCAL_CLUSTER_NAME};
use crate::hub::operator::S3Credentials;
use crate::types::curator::UpgradeType;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_OPTIONS_FILE: &str = "resources/options.yaml";

#[derive(Deserialize, Debug, Clone, Default)]
pub struct OptionsFile {
    #[serde(default)]
    pub options: Options,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Options {
    #[serde(default)]
    pub hub: HubOptions,
    #[serde(default)]
    pub clusters: ClustersOptions,
    #[serde(default)]
    pub credentials: CredentialsOptions,
    #[serde(default)]
    pub clustercurator: CuratorOptions,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HubOptions {
    pub cluster_name: Option<String>,
    pub kubeconfig: Option<String>,
    pub kubecontext: Option<String>,
    #[serde(rename = "apiServerURL")]
    pub api_server_url: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ClustersOptions {
    #[serde(default)]
    pub aws: ClusterOptions,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOptions {
    pub cluster_name: Option<String>,
    pub namespace: Option<String>,
    pub base_domain: Option<String>,
    pub region: Option<String>,
    pub release_image: Option<String>,
    pub node_pool_replicas: Option<String>,
    pub aws_creds: Option<String>,
    pub instance_type: Option<String>,
    #[serde(rename = "generateSSH", default)]
    pub generate_ssh: bool,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsOptions {
    #[serde(default)]
    pub secrets: SecretsOptions,
    #[serde(default)]
    pub api_keys: ApiKeysOptions,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecretsOptions {
    pub pull_secret: Option<String>,
    #[serde(rename = "sshPrivatekey")]
    pub ssh_private_key: Option<String>,
    #[serde(rename = "sshPublickey")]
    pub ssh_public_key: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeysOptions {
    #[serde(default)]
    pub s3: AwsApiKey,
    #[serde(default)]
    pub aws: AwsApiKey,
    pub aws_creds_file: Option<String>,
    #[serde(rename = "awsCredName")]
    pub aws_cred_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AwsApiKey {
    #[serde(rename = "awsAccessKeyID", default)]
    pub access_key_id: String,
    #[serde(rename = "awsSecretAccessKeyID", default)]
    pub secret_access_key: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CuratorOptions {
    pub channel: Option<String>,
    pub upgrade_type: Option<String>,
    pub desired_update: Option<String>,
}

impl Options {
    /// Load the options file from, in order: `explicit`, `OPTIONS_FILE`,
    /// `resources/options.yaml`. Only the default location may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Options> {
        let from_env = env::var("OPTIONS_FILE").ok().filter(|v| !v.is_empty());
        let path = match (explicit, from_env) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(path)) => PathBuf::from(path),
            (None, None) => {
                let default = Path::new(DEFAULT_OPTIONS_FILE);
                if !default.exists() {
                    warn!("No options file at {}, using environment only", DEFAULT_OPTIONS_FILE);
                    return Ok(Options::default());
                }
                default.to_path_buf()
            }
        };

        info!("Loading options from {}", path.display());
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read options file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse options file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Options> {
        let file: OptionsFile = serde_yaml::from_str(contents)?;
        Ok(file.options)
    }
}

/// Fully resolved settings for a run
#[derive(Debug, Clone)]
pub struct Config {
    pub kubeconfig: Option<PathBuf>,
    pub hcp_cli: String,
    /// Cluster to operate on for single-cluster scenarios. Empty when unset.
    pub cluster_name: String,
    pub cluster_name_prefix: String,
    pub namespace: String,
    pub region: String,
    pub node_pool_replicas: String,
    pub base_domain: String,
    pub release_image: String,
    pub arch: String,
    pub instance_type: String,
    pub aws_sts_creds: Option<String>,
    pub aws_role_arn: Option<String>,
    pub s3_credentials: S3Credentials,
    pub aws_creds: String,
    pub pull_secret: String,
    pub secret_creds_name: String,
    pub aap_host: String,
    pub aap_token: String,
    pub curator_enabled: bool,
    pub fips_enabled: bool,
    pub kubevirt_memory: String,
    pub kubevirt_cores: String,
    pub upgrade_channel: String,
    pub upgrade_type: Option<UpgradeType>,
    pub desired_update: String,
    pub managed_cluster_name: String,
    pub prometheus_url: Option<String>,
    pub prometheus_token: Option<String>,
    pub prometheus_insecure: bool,
    pub must_gather_script: Option<PathBuf>,
}

fn or_default(value: Option<String>, default: &str) -> String {
    value.unwrap_or_else(|| default.to_string())
}

impl Config {
    /// Resolve settings from the options file and `lookup`, which stands in
    /// for the process environment. Empty variables count as unset.
    pub fn resolve(options: &Options, lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let flag = |name: &str, default: bool| var(name).map_or(default, |v| v.parse().unwrap_or(default));
        let aws = &options.clusters.aws;
        let api_keys = &options.credentials.api_keys;
        let curator = &options.clustercurator;

        let upgrade_type = var("HCP_UPGRADE_TYPE")
            .or_else(|| curator.upgrade_type.clone())
            .filter(|v| !v.is_empty())
            .map(|v| v.parse::<UpgradeType>().map_err(|e| anyhow!(e)))
            .transpose()
            .context("Invalid upgrade type")?;

        let s3_credentials = match (var("S3_ACCESS_KEY_ID"), var("S3_ACCESS_SECRET")) {
            (Some(access_key_id), Some(secret_access_key)) => S3Credentials {
                access_key_id,
                secret_access_key,
            },
            _ => S3Credentials {
                access_key_id: api_keys.s3.access_key_id.clone(),
                secret_access_key: api_keys.s3.secret_access_key.clone(),
            },
        };

        Ok(Config {
            kubeconfig: options
                .hub
                .kubeconfig
                .clone()
                .filter(|v| !v.is_empty())
                .or_else(|| var("KUBECONFIG"))
                .map(PathBuf::from),
            hcp_cli: or_default(var("HCP_CLI"), HCP_CLI_NAME),
            cluster_name: var("HCP_CLUSTER_NAME")
                .or_else(|| aws.cluster_name.clone())
                .unwrap_or_default(),
            cluster_name_prefix: DEFAULT_CLUSTER_NAME_PREFIX.to_string(),
            namespace: or_default(var("HCP_NAMESPACE"), DEFAULT_HOSTED_CLUSTER_NAMESPACE),
            region: var("HCP_REGION").or_else(|| aws.region.clone()).unwrap_or_default(),
            node_pool_replicas: var("HCP_NODE_POOL_REPLICAS")
                .or_else(|| aws.node_pool_replicas.clone())
                .unwrap_or_default(),
            base_domain: var("HCP_BASE_DOMAIN_NAME")
                .or_else(|| aws.base_domain.clone())
                .unwrap_or_default(),
            release_image: var("HCP_RELEASE_IMAGE")
                .or_else(|| aws.release_image.clone())
                .unwrap_or_default(),
            arch: or_default(var("HCP_ARCH"), "amd64"),
            instance_type: var("HCP_INSTANCE_TYPE")
                .or_else(|| aws.instance_type.clone())
                .unwrap_or_default(),
            aws_sts_creds: var("AWS_STS_CREDS_FILE_PATH"),
            aws_role_arn: var("AWS_ROLE_ARN"),
            s3_credentials,
            aws_creds: var("AWS_CREDS")
                .or_else(|| api_keys.aws_creds_file.clone())
                .unwrap_or_default(),
            pull_secret: var("PULL_SECRET")
                .or_else(|| options.credentials.secrets.pull_secret.clone())
                .unwrap_or_default(),
            secret_creds_name: var("SECRET_AWS_CRED_NAME")
                .or_else(|| api_keys.aws_cred_name.clone().filter(|v| !v.is_empty()))
                .unwrap_or_else(|| "qe-hs-aws-secret".to_string()),
            aap_host: var("AAP_HOST").unwrap_or_default(),
            aap_token: var("AAP_TOKEN").unwrap_or_default(),
            curator_enabled: flag("CURATOR_ENABLED", false),
            fips_enabled: flag("FIPS_ENABLED", true),
            kubevirt_memory: or_default(var("HCP_MEMORY"), "10Gi"),
            kubevirt_cores: or_default(var("HCP_CPU_CORES"), "2"),
            upgrade_channel: var("HCP_UPGRADE_CHANNEL")
                .or_else(|| curator.channel.clone().filter(|v| !v.is_empty()))
                .unwrap_or_else(|| "fast-4.14".to_string()),
            upgrade_type,
            desired_update: var("HCP_UPGRADE_DESIRED_UPDATE")
                .or_else(|| curator.desired_update.clone())
                .unwrap_or_default(),
            managed_cluster_name: or_default(var("MANAGED_CLUSTER_NAME"), LOCAL_CLUSTER_NAME),
            prometheus_url: var("PROMETHEUS_URL"),
            prometheus_token: var("PROMETHEUS_TOKEN"),
            prometheus_insecure: flag("PROMETHEUS_INSECURE", true),
            must_gather_script: var("MUST_GATHER_SCRIPT").map(PathBuf::from),
        })
    }

    /// Resolve against the process environment
    pub fn from_env(options: &Options) -> Result<Config> {
        Self::resolve(options, |name| env::var(name).ok())
    }

    /// Value of an optional setting, or an error naming its variable
    pub fn require<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
        value
            .as_deref()
            .ok_or_else(|| anyhow!("{} must be set", name))
    }
}
