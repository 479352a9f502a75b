// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! End-to-end scenarios, one per subcommand of the binary.
//!
//! A scenario either passes, is skipped because its prerequisites are not
//! met, or fails with an error describing the first check that did not hold.

pub mod addon;
pub mod console;
pub mod create;
pub mod destroy;
pub mod metrics;
pub mod must_gather;
pub mod setup;
pub mod upgrade;

use crate::config::Config;
use crate::constants::poll;
use crate::hcp::HcpCli;
use crate::kubernetes::ResourceClient;
use crate::wait::PollSettings;
use anyhow::Result;
use clap::{Args, Subcommand};
use kube::Client;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Skipped(String),
}

impl Outcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Outcome::Skipped(reason.into())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "passed"),
            Outcome::Skipped(reason) => write!(f, "skipped: {}", reason),
        }
    }
}

/// Everything a scenario needs: resolved settings, a hub client and the CLI.
pub struct Suite {
    pub config: Config,
    pub resources: ResourceClient,
    pub cli: HcpCli,
    interval: Duration,
    upgrade_interval: Duration,
    rotation_interval: Duration,
}

impl Suite {
    pub fn new(config: Config, client: Client) -> Self {
        let cli = HcpCli::new(config.hcp_cli.clone());
        Self {
            config,
            resources: ResourceClient::new(client),
            cli,
            interval: poll::INTERVAL,
            upgrade_interval: poll::UPGRADE_INTERVAL,
            rotation_interval: poll::POD_ROTATION_INTERVAL,
        }
    }

    /// Use a different poll interval for every wait
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self.upgrade_interval = interval;
        self.rotation_interval = interval;
        self
    }

    pub fn client(&self) -> &Client {
        self.resources.client()
    }

    /// Poll settings with the suite interval and the given deadline
    pub fn settings(&self, timeout: Duration) -> PollSettings {
        PollSettings::new(self.interval, timeout)
    }

    /// Settings for the long cluster lifecycle waits
    pub fn long_wait(&self) -> PollSettings {
        self.settings(poll::SCENARIO_TIMEOUT)
    }

    pub fn short_wait(&self) -> PollSettings {
        self.settings(poll::SHORT_TIMEOUT)
    }

    /// Curator upgrades move slowly, so they are polled less often
    pub fn upgrade_wait(&self, timeout: Duration) -> PollSettings {
        PollSettings::new(self.upgrade_interval, timeout)
    }

    /// Settings for watching pods being replaced
    pub fn rotation_wait(&self) -> PollSettings {
        PollSettings::new(self.rotation_interval, poll::POD_ROTATION_TIMEOUT)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct DestroyOpts {
    /// Destroy every hosted cluster of the platform instead of HCP_CLUSTER_NAME
    #[arg(long)]
    pub all: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Scenario {
    /// Check the CLI, the hypershift operator and add-on, and the OIDC S3 secret
    Setup,
    /// Create an AWS hosted cluster and wait for it to be imported
    CreateAws,
    /// Create a KubeVirt hosted cluster and wait for it to be imported
    CreateKubevirt,
    /// Destroy AWS hosted clusters
    DestroyAws(DestroyOpts),
    /// Destroy KubeVirt hosted clusters
    DestroyKubevirt(DestroyOpts),
    /// Change a hosted cluster's channel through its ClusterCurator
    ChannelUpgrade,
    /// Upgrade only the control plane through the ClusterCurator
    ControlPlaneUpgrade,
    /// Upgrade only the node pools through the ClusterCurator
    NodepoolUpgrade,
    /// Log the channels a hosted cluster may move to
    AvailableChannels,
    /// Check add-on metrics and hosted cluster counts in Prometheus
    Metrics,
    /// Changing the OIDC S3 secret re-runs the hypershift install job
    S3SecretReinstall,
    /// The add-on status reflects the operator and external-dns deployments
    AddonStatus,
    /// Check the hcp ConsoleCLIDownload and its links
    CliDownload,
    /// Run the must-gather script
    MustGather,
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Setup => "setup",
            Scenario::CreateAws => "create-aws",
            Scenario::CreateKubevirt => "create-kubevirt",
            Scenario::DestroyAws(_) => "destroy-aws",
            Scenario::DestroyKubevirt(_) => "destroy-kubevirt",
            Scenario::ChannelUpgrade => "channel-upgrade",
            Scenario::ControlPlaneUpgrade => "control-plane-upgrade",
            Scenario::NodepoolUpgrade => "nodepool-upgrade",
            Scenario::AvailableChannels => "available-channels",
            Scenario::Metrics => "metrics",
            Scenario::S3SecretReinstall => "s3-secret-reinstall",
            Scenario::AddonStatus => "addon-status",
            Scenario::CliDownload => "cli-download",
            Scenario::MustGather => "must-gather",
        }
    }

    pub async fn run(&self, suite: &Suite) -> Result<Outcome> {
        use crate::hcp::Platform;

        match self {
            Scenario::Setup => setup::run(suite).await,
            Scenario::CreateAws => create::create_aws(suite).await,
            Scenario::CreateKubevirt => create::create_kubevirt(suite).await,
            Scenario::DestroyAws(opts) => destroy::run(suite, Platform::Aws, opts).await,
            Scenario::DestroyKubevirt(opts) => destroy::run(suite, Platform::KubeVirt, opts).await,
            Scenario::ChannelUpgrade => upgrade::channel(suite).await,
            Scenario::ControlPlaneUpgrade => upgrade::control_plane(suite).await,
            Scenario::NodepoolUpgrade => upgrade::node_pools(suite).await,
            Scenario::AvailableChannels => upgrade::available_channels(suite).await,
            Scenario::Metrics => metrics::run(suite).await,
            Scenario::S3SecretReinstall => addon::s3_secret_reinstall(suite).await,
            Scenario::AddonStatus => addon::status(suite).await,
            Scenario::CliDownload => console::run(suite).await,
            Scenario::MustGather => must_gather::run(suite).await,
        }
    }
}
