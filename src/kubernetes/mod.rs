// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for hub client creation, API discovery and generic resource access.

pub mod client;
pub mod crd;
pub mod namespaces;
pub mod resources;

pub use client::create_hub_client;
pub use crd::api_group_served;
pub use namespaces::namespace_labels;
pub use resources::ResourceClient;
