// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource descriptors, status conditions and typed views over dynamic objects.

pub mod condition;
pub mod console;
pub mod curator;
pub mod hosted_cluster;
pub mod resource;

pub use condition::Condition;
pub use resource::{ResourceRef, ResourceType, Scope};

use crate::error::{E2eError, Result};
use kube::api::DynamicObject;
use kube::ResourceExt;
use serde::de::DeserializeOwned;

/// Decode the body of a dynamic object into a typed view.
///
/// Views only declare the fields they read; absent fields must be optional on
/// the view, while a field of the wrong JSON type is reported as malformed.
pub fn decode<T: DeserializeOwned>(obj: &DynamicObject) -> Result<T> {
    serde_json::from_value(obj.data.clone()).map_err(|e| E2eError::MalformedResource {
        resource: describe(obj),
        reason: e.to_string(),
    })
}

/// Human readable identity of a dynamic object, e.g. `HostedCluster clusters/demo`
pub fn describe(obj: &DynamicObject) -> String {
    let kind = obj
        .types
        .as_ref()
        .map(|t| t.kind.as_str())
        .unwrap_or("object");
    match obj.namespace() {
        Some(ns) => format!("{} {}/{}", kind, ns, obj.name_any()),
        None => format!("{} {}", kind, obj.name_any()),
    }
}
