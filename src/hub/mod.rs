// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Helpers for the objects the hypershift add-on manages on the hub.

pub mod console;
pub mod curator;
pub mod hosted_clusters;
pub mod managed_clusters;
pub mod operator;

use crate::error::Result;
use crate::kubernetes::ResourceClient;
use crate::types::ResourceRef;
use crate::wait::{poll_until, PollSettings, PollStep};
use std::collections::BTreeMap;

/// Entries of `expected` that are missing from or differ in `actual`, as
/// `key=value` strings.
pub fn missing_entries(actual: &BTreeMap<String, String>, expected: &BTreeMap<String, String>) -> Vec<String> {
    expected
        .iter()
        .filter(|(k, v)| actual.get(*k) != Some(*v))
        .map(|(k, v)| format!("{}={}", k, v))
        .collect()
}

/// Poll until the labels of `resource` contain every entry of `expected`.
pub async fn wait_for_labels(
    resources: &ResourceClient,
    resource: &ResourceRef,
    expected: &BTreeMap<String, String>,
    settings: &PollSettings,
) -> Result<()> {
    let description = format!("labels {:?} on {}", expected, resource);
    poll_until(&description, settings, move || async move {
        let labels = resources.labels(resource).await?;
        let missing = missing_entries(&labels, expected);
        Ok(if missing.is_empty() {
            PollStep::Ready(())
        } else {
            PollStep::Pending(format!("missing {:?}, have {:?}", missing, labels))
        })
    })
    .await
}

/// Poll until the annotations of `resource` contain every entry of `expected`.
pub async fn wait_for_annotations(
    resources: &ResourceClient,
    resource: &ResourceRef,
    expected: &BTreeMap<String, String>,
    settings: &PollSettings,
) -> Result<()> {
    let description = format!("annotations {:?} on {}", expected, resource);
    poll_until(&description, settings, move || async move {
        let annotations = resources.annotations(resource).await?;
        let missing = missing_entries(&annotations, expected);
        Ok(if missing.is_empty() {
            PollStep::Ready(())
        } else {
            PollStep::Pending(format!("missing {:?}, have {:?}", missing, annotations))
        })
    })
    .await
}
