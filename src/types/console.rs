// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleCliDownloadView {
    #[serde(default)]
    pub spec: ConsoleCliDownloadSpec,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleCliDownloadSpec {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub links: Vec<CliDownloadLink>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CliDownloadLink {
    pub href: String,
    #[serde(default)]
    pub text: String,
}

impl ConsoleCliDownloadView {
    /// First link whose href mentions the given `os/arch` pair
    pub fn link_for(&self, os_arch: &str) -> Option<&CliDownloadLink> {
        self.spec.links.iter().find(|l| l.href.contains(os_arch))
    }
}
