// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Driving the `hcp` command-line tool as a subprocess.

pub mod args;
pub mod cli;

pub use args::{CreateAwsArgs, CreateKubevirtArgs, DestroyArgs, Platform};
pub use cli::{generate_cluster_name, run_script, CommandOutput, HcpCli};
