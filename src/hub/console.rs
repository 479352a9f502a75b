// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The `hcp` ConsoleCLIDownload published by the hypershift add-on.

use crate::constants::hub::HCP_CLI_DOWNLOAD_NAME;
use crate::error::{E2eError, Result};
use crate::kubernetes::ResourceClient;
use crate::types::console::{CliDownloadLink, ConsoleCliDownloadView};
use crate::types::resource::CONSOLE_CLI_DOWNLOAD;
use crate::types::{decode, ResourceRef};
use reqwest::StatusCode;
use tracing::{debug, info, instrument};

pub const DISPLAY_NAME: &str = "hcp - Hosted Control Plane Command Line Interface (CLI)";
pub const DESCRIPTION: &str =
    "With the Hosted Control Plane command line interface, you can create and manage OpenShift hosted clusters.\n";
pub const ARCHIVE_NAME: &str = "hcp.tar.gz";

/// OS/arch pairs the download must offer, with the link text for each
pub const EXPECTED_LINKS: &[(&str, &str)] = &[
    ("linux/amd64", "Download hcp CLI for Linux for x86_64"),
    ("linux/arm64", "Download hcp CLI for Linux for ARM 64"),
    ("darwin/amd64", "Download hcp CLI for Mac for x86_64"),
    ("darwin/arm64", "Download hcp CLI for Mac for ARM 64"),
    ("windows/amd64", "Download hcp CLI for Windows for x86_64"),
];

pub async fn get_cli_download(resources: &ResourceClient) -> Result<ConsoleCliDownloadView> {
    let obj = resources
        .get(&ResourceRef::cluster(CONSOLE_CLI_DOWNLOAD, HCP_CLI_DOWNLOAD_NAME))
        .await?;
    decode(&obj)
}

pub fn verify_display(view: &ConsoleCliDownloadView) -> Result<()> {
    if view.spec.display_name != DISPLAY_NAME {
        return Err(E2eError::AssertionFailed(format!(
            "unexpected display name {:?}",
            view.spec.display_name
        )));
    }
    if view.spec.description != DESCRIPTION {
        return Err(E2eError::AssertionFailed(format!(
            "unexpected description {:?}",
            view.spec.description
        )));
    }
    Ok(())
}

/// Find the link for `os_arch` and check its href and text.
pub fn verify_link<'a>(view: &'a ConsoleCliDownloadView, os_arch: &str, text: &str) -> Result<&'a CliDownloadLink> {
    let path = format!("{}/{}", os_arch, ARCHIVE_NAME);
    view.spec
        .links
        .iter()
        .find(|l| l.href.contains(&path) && l.text.contains(text))
        .ok_or_else(|| {
            E2eError::AssertionFailed(format!(
                "no download link with href containing {:?} and text {:?}",
                path, text
            ))
        })
}

/// HTTP client for the download links. The route certificate is usually
/// self-signed on test hubs.
pub fn download_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()?)
}

#[instrument(skip(http))]
pub async fn check_link_reachable(http: &reqwest::Client, href: &str) -> Result<()> {
    let response = http.get(href).send().await?;
    let status = response.status();
    debug!("GET {} returned {}", href, status);
    if status != StatusCode::OK {
        return Err(E2eError::AssertionFailed(format!("GET {} returned {}", href, status)));
    }
    info!("Download link {} is reachable", href);
    Ok(())
}
