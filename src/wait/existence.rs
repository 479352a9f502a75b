// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::{poll_until, PollSettings, PollStep};
use crate::error::{E2eError, Result};
use crate::kubernetes::ResourceClient;
use crate::types::ResourceRef;
use std::fmt;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presence::Present => write!(f, "present"),
            Presence::Absent => write!(f, "absent"),
        }
    }
}

/// Poll until `resource` is present or absent.
///
/// Not-found is the only error treated as an answer; anything else from the
/// existence check is returned immediately.
#[instrument(skip(resources, settings), fields(resource = %resource))]
pub async fn wait_for(
    resources: &ResourceClient,
    resource: &ResourceRef,
    expected: Presence,
    settings: &PollSettings,
) -> Result<()> {
    let description = format!("{} to be {}", resource, expected);

    let result = poll_until(&description, settings, move || async move {
        let present = resources.exists(resource).await?;
        let observed = if present { Presence::Present } else { Presence::Absent };
        Ok(if observed == expected {
            PollStep::Ready(())
        } else {
            PollStep::Pending(observed.to_string())
        })
    })
    .await;

    match result {
        Ok(()) => {
            info!("{} is {}", resource, expected);
            Ok(())
        }
        Err(E2eError::PollTimeout { elapsed, .. }) => Err(E2eError::ExistenceTimeout {
            resource: resource.to_string(),
            expected: expected.to_string(),
            elapsed,
        }),
        Err(e) => Err(e),
    }
}

pub async fn wait_for_presence(
    resources: &ResourceClient,
    resource: &ResourceRef,
    settings: &PollSettings,
) -> Result<()> {
    wait_for(resources, resource, Presence::Present, settings).await
}

pub async fn wait_for_absence(
    resources: &ResourceClient,
    resource: &ResourceRef,
    settings: &PollSettings,
) -> Result<()> {
    wait_for(resources, resource, Presence::Absent, settings).await
}
