// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{poll, DEFAULT_CLUSTER_NAME_PREFIX, HCP_CLI_NAME};
use crate::error::{E2eError, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Cluster names end up in external DNS records, so they are kept short.
const MAX_CLUSTER_NAME_LEN: usize = 25;
/// Hex characters of the uuid that always survive in a generated name
const MIN_SUFFIX_LEN: usize = 8;

/// Exit code and combined output of a finished command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub code: Option<i32>,
    /// stdout followed by stderr
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct HcpCli {
    binary: String,
}

impl Default for HcpCli {
    fn default() -> Self {
        Self::new(HCP_CLI_NAME)
    }
}

impl HcpCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// `hcp version`, which must succeed within a minute
    pub async fn version(&self) -> Result<CommandOutput> {
        self.run(&["version".to_string()], poll::CLI_VERSION_TIMEOUT).await
    }

    /// Run the CLI with `args`. Anything but exit code 0 within `timeout` is
    /// an error; on timeout the child process is killed.
    #[instrument(skip(self, args), fields(binary = %self.binary))]
    pub async fn run(&self, args: &[String], timeout: Duration) -> Result<CommandOutput> {
        let mut command = Command::new(&self.binary);
        command.args(args);
        run_command(command, &format!("{} {}", self.binary, args.join(" ")), timeout).await
    }
}

/// Run a shell script with `/bin/sh`.
pub async fn run_script(script: &Path, timeout: Duration) -> Result<CommandOutput> {
    let mut command = Command::new("/bin/sh");
    command.arg(script);
    run_command(command, &format!("/bin/sh {}", script.display()), timeout).await
}

async fn run_command(mut command: Command, command_line: &str, timeout: Duration) -> Result<CommandOutput> {
    info!("Running {}", command_line);

    let child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| E2eError::CommandSpawn {
            command: command_line.to_string(),
            source,
        })?;

    // Dropping the future on timeout drops the child, which kills it.
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|source| E2eError::CommandSpawn {
            command: command_line.to_string(),
            source,
        })?,
        Err(_) => {
            return Err(E2eError::CommandTimeout {
                command: command_line.to_string(),
                timeout,
            })
        }
    };

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    for line in combined.lines() {
        debug!("{}", line);
    }

    let code = output.status.code();
    if !output.status.success() {
        return Err(E2eError::CommandFailed {
            command: command_line.to_string(),
            code,
            output: combined,
        });
    }

    Ok(CommandOutput { code, output: combined })
}

/// A unique, DNS-friendly cluster name: `<prefix>-<uuid hex>`, 25 characters
/// long. The prefix keeps only ASCII letters, digits and `-`, lowercased, and
/// is cut short enough to leave at least 8 hex characters of the uuid. An
/// empty prefix falls back to `acmqe-hc`.
pub fn generate_cluster_name(prefix: &str) -> String {
    let mut prefix: String = prefix
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_CLUSTER_NAME_LEN - MIN_SUFFIX_LEN - 1)
        .collect();
    if prefix.is_empty() {
        prefix = DEFAULT_CLUSTER_NAME_PREFIX.to_string();
    }
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let suffix_len = MAX_CLUSTER_NAME_LEN - prefix.len() - 1;
    format!("{}-{}", prefix, &suffix[..suffix_len])
}
