// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::api::{ApiResource, GroupVersionKind};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Namespaced,
    Cluster,
}

/// A group/version/resource triplet plus the kind and scope needed to talk to
/// the dynamic API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceType {
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
    pub plural: &'static str,
    pub scope: Scope,
}

impl ResourceType {
    pub fn api_resource(&self) -> ApiResource {
        let gvk = GroupVersionKind::gvk(self.group, self.version, self.kind);
        ApiResource::from_gvk_with_plural(&gvk, self.plural)
    }

    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.to_string()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

pub const HOSTED_CLUSTER: ResourceType = ResourceType {
    group: "hypershift.openshift.io",
    version: "v1beta1",
    kind: "HostedCluster",
    plural: "hostedclusters",
    scope: Scope::Namespaced,
};

pub const NODE_POOL: ResourceType = ResourceType {
    group: "hypershift.openshift.io",
    version: "v1beta1",
    kind: "NodePool",
    plural: "nodepools",
    scope: Scope::Namespaced,
};

pub const MANAGED_CLUSTER: ResourceType = ResourceType {
    group: "cluster.open-cluster-management.io",
    version: "v1",
    kind: "ManagedCluster",
    plural: "managedclusters",
    scope: Scope::Cluster,
};

pub const MANAGED_CLUSTER_ADDON: ResourceType = ResourceType {
    group: "addon.open-cluster-management.io",
    version: "v1alpha1",
    kind: "ManagedClusterAddOn",
    plural: "managedclusteraddons",
    scope: Scope::Namespaced,
};

pub const CLUSTER_CURATOR: ResourceType = ResourceType {
    group: "cluster.open-cluster-management.io",
    version: "v1beta1",
    kind: "ClusterCurator",
    plural: "clustercurators",
    scope: Scope::Namespaced,
};

pub const ANSIBLE_JOB: ResourceType = ResourceType {
    group: "tower.ansible.com",
    version: "v1alpha1",
    kind: "AnsibleJob",
    plural: "ansiblejobs",
    scope: Scope::Namespaced,
};

pub const MULTICLUSTER_HUB: ResourceType = ResourceType {
    group: "operator.open-cluster-management.io",
    version: "v1",
    kind: "MultiClusterHub",
    plural: "multiclusterhubs",
    scope: Scope::Namespaced,
};

pub const MULTICLUSTER_ENGINE: ResourceType = ResourceType {
    group: "multicluster.openshift.io",
    version: "v1",
    kind: "MultiClusterEngine",
    plural: "multiclusterengines",
    scope: Scope::Cluster,
};

pub const CONSOLE_CLI_DOWNLOAD: ResourceType = ResourceType {
    group: "console.openshift.io",
    version: "v1",
    kind: "ConsoleCLIDownload",
    plural: "consoleclidownloads",
    scope: Scope::Cluster,
};

pub const SERVICE_MONITOR: ResourceType = ResourceType {
    group: "monitoring.coreos.com",
    version: "v1",
    kind: "ServiceMonitor",
    plural: "servicemonitors",
    scope: Scope::Namespaced,
};

pub const SECRET: ResourceType = ResourceType {
    group: "",
    version: "v1",
    kind: "Secret",
    plural: "secrets",
    scope: Scope::Namespaced,
};

pub const DEPLOYMENT: ResourceType = ResourceType {
    group: "apps",
    version: "v1",
    kind: "Deployment",
    plural: "deployments",
    scope: Scope::Namespaced,
};

pub const POD: ResourceType = ResourceType {
    group: "",
    version: "v1",
    kind: "Pod",
    plural: "pods",
    scope: Scope::Namespaced,
};

pub const NAMESPACE: ResourceType = ResourceType {
    group: "",
    version: "v1",
    kind: "Namespace",
    plural: "namespaces",
    scope: Scope::Cluster,
};

/// Address of a single resource. Built fresh for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub resource_type: ResourceType,
    pub namespace: Option<String>,
    pub name: String,
}

impl ResourceRef {
    /// An empty namespace means a cluster-scoped lookup.
    pub fn new(resource_type: ResourceType, namespace: &str, name: &str) -> Self {
        Self {
            resource_type,
            namespace: (!namespace.is_empty()).then(|| namespace.to_string()),
            name: name.to_string(),
        }
    }

    pub fn namespaced(resource_type: ResourceType, namespace: &str, name: &str) -> Self {
        Self::new(resource_type, namespace, name)
    }

    pub fn cluster(resource_type: ResourceType, name: &str) -> Self {
        Self::new(resource_type, "", name)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} {}/{}", self.resource_type.kind, ns, self.name),
            None => write!(f, "{} {}", self.resource_type.kind, self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_core_group() {
        assert_eq!(SECRET.api_version(), "v1");
        assert_eq!(HOSTED_CLUSTER.api_version(), "hypershift.openshift.io/v1beta1");
    }

    #[test]
    fn test_api_resource_uses_plural() {
        let ar = MANAGED_CLUSTER_ADDON.api_resource();
        assert_eq!(ar.plural, "managedclusteraddons");
        assert_eq!(ar.kind, "ManagedClusterAddOn");
        assert_eq!(ar.api_version, "addon.open-cluster-management.io/v1alpha1");
    }

    #[test]
    fn test_empty_namespace_is_cluster_scoped() {
        let r = ResourceRef::new(MANAGED_CLUSTER, "", "demo-cluster");
        assert_eq!(r.namespace, None);
        assert_eq!(r.to_string(), "ManagedCluster demo-cluster");
    }

    #[test]
    fn test_display_namespaced() {
        let r = ResourceRef::namespaced(HOSTED_CLUSTER, "clusters", "demo-cluster");
        assert_eq!(r.to_string(), "HostedCluster clusters/demo-cluster");
    }
}
