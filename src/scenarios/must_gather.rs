// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{Outcome, Suite};
use crate::constants::poll;
use crate::hcp::run_script;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub const DEFAULT_SCRIPT: &str = "scripts/must-gather/run_must_gather_hcp.sh";

pub async fn run(suite: &Suite) -> Result<Outcome> {
    let script = suite
        .config
        .must_gather_script
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_SCRIPT));

    let output = run_script(script, poll::SCENARIO_TIMEOUT)
        .await
        .with_context(|| format!("must-gather script {} failed", script.display()))?;
    info!("must-gather finished with {} line(s) of output", output.output.lines().count());
    Ok(Outcome::Passed)
}
