// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{Outcome, Suite};
use crate::hub::console::{
    check_link_reachable, download_client, get_cli_download, verify_display, verify_link, EXPECTED_LINKS,
};
use crate::kubernetes::api_group_served;
use crate::types::console::ConsoleCliDownloadView;
use crate::types::resource::CONSOLE_CLI_DOWNLOAD;
use anyhow::{Context, Result};
use tracing::info;

pub async fn run(suite: &Suite) -> Result<Outcome> {
    let group = CONSOLE_CLI_DOWNLOAD.group;
    if !api_group_served(suite.client(), group).await? {
        return Ok(Outcome::skipped(format!("API group {} is not served by the hub", group)));
    }

    let download = get_cli_download(&suite.resources)
        .await
        .context("failed to read the hcp ConsoleCLIDownload")?;
    let hrefs = verify_download(&download)?;

    let http = download_client()?;
    for href in &hrefs {
        check_link_reachable(&http, href).await?;
    }
    info!("All {} hcp download links are reachable", hrefs.len());
    Ok(Outcome::Passed)
}

/// Check display name, description and the link for every OS/arch pair.
/// Returns the hrefs in the order of [`EXPECTED_LINKS`].
pub fn verify_download(download: &ConsoleCliDownloadView) -> Result<Vec<String>> {
    verify_display(download)?;
    EXPECTED_LINKS
        .iter()
        .map(|(os_arch, text)| -> Result<String> { Ok(verify_link(download, os_arch, text)?.href.clone()) })
        .collect()
}
