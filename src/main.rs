// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hcp_e2e::config::{Config, Options};
use hcp_e2e::kubernetes::create_hub_client;
use hcp_e2e::scenarios::{Outcome, Scenario, Suite};

/// End-to-end checks for hosted control planes on an ACM/MCE hub
#[derive(Parser, Debug)]
#[command(name = "hcp-e2e", version, about)]
struct Cli {
    /// Options file, overrides OPTIONS_FILE
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    /// Debug logging when RUST_LOG is not set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    scenario: Scenario,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_target(false))
        .init();

    let options = Options::load(cli.options.as_deref())?;
    let config = Config::from_env(&options)?;
    let client = create_hub_client(config.kubeconfig.as_deref())
        .await
        .context("failed to connect to the hub")?;
    info!("Connected to hub cluster");

    let suite = Suite::new(config, client);
    let name = cli.scenario.name();
    let start = Instant::now();
    info!("Running scenario {}", name);

    match cli.scenario.run(&suite).await.with_context(|| format!("scenario {} failed", name))? {
        Outcome::Passed => info!("Scenario {} passed in {:?}", name, start.elapsed()),
        Outcome::Skipped(reason) => warn!("Scenario {} skipped: {}", name, reason),
    }
    Ok(())
}
