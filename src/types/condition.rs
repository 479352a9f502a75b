// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::{E2eError, Result};
use kube::api::DynamicObject;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A `status.conditions[]` entry following the usual Kubernetes convention.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reason: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type={} status={} reason={} message={:?}",
            self.condition_type, self.status, self.reason, self.message
        )
    }
}

/// Read the condition list of a dynamic object.
///
/// Returns an empty list when the object has no status or no conditions yet.
pub fn conditions_of(obj: &DynamicObject) -> Result<Vec<Condition>> {
    match obj.data.pointer("/status/conditions") {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|e| E2eError::MalformedResource {
                resource: super::describe(obj),
                reason: format!("status.conditions: {}", e),
            })
        }
    }
}

/// First condition with the given type
pub fn find_condition<'a>(conditions: &'a [Condition], condition_type: &str) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.condition_type == condition_type)
}
