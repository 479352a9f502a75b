// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The field manager name used for server-side apply
pub const FIELD_MANAGER: &str = "hcp-e2e";

/// Default name of the hosted control plane CLI binary
pub const HCP_CLI_NAME: &str = "hcp";

pub const LOCAL_CLUSTER_NAME: &str = "local-cluster";
pub const DEFAULT_HOSTED_CLUSTER_NAMESPACE: &str = "clusters";
pub const DEFAULT_CLUSTER_NAME_PREFIX: &str = "acmqe-hc";

/// Hub-side hypershift components
pub mod hub {
    pub const HYPERSHIFT_NAMESPACE: &str = "hypershift";
    pub const HYPERSHIFT_OPERATOR: &str = "operator";
    pub const EXTERNAL_DNS_OPERATOR: &str = "external-dns";
    pub const ADDON_NAME: &str = "hypershift-addon";
    pub const ADDON_MANAGER_NAME: &str = "hypershift-addon-manager";
    pub const ADDON_MANAGER_NAMESPACE: &str = "multicluster-engine";
    pub const ADDON_AGENT_NAMESPACE: &str = "open-cluster-management-agent-addon";
    pub const MONITORING_NAMESPACE: &str = "openshift-monitoring";
    pub const S3_OIDC_SECRET_NAME: &str = "hypershift-operator-oidc-provider-s3-credentials";
    pub const S3_OIDC_BUCKET: &str = "acmqe-hypershift";
    pub const S3_OIDC_REGION: &str = "us-east-1";
    pub const INSTALL_JOB_PREFIX: &str = "hypershift-install-job";
    pub const HCP_CLI_DOWNLOAD_NAME: &str = "hcp-cli-download";
    pub const MCE_SERVICE_MONITOR: &str = "mce-hypershift-addon-agent-metrics";
    pub const ACM_SERVICE_MONITOR: &str = "acm-hypershift-addon-agent-metrics";
}

/// Label keys checked on imported managed clusters
pub mod labels {
    pub const NAME: &str = "name";
    pub const CLOUD: &str = "cloud";
    pub const CLUSTERSET: &str = "cluster.open-cluster-management.io/clusterset";
    pub const VENDOR: &str = "vendor";
    pub const CLUSTER_MONITORING: &str = "openshift.io/cluster-monitoring";
}

/// Annotation keys checked on imported managed clusters
pub mod annotations {
    pub const KLUSTERLET_DEPLOY_MODE: &str = "import.open-cluster-management.io/klusterlet-deploy-mode";
    pub const HOSTING_CLUSTER_NAME: &str = "import.open-cluster-management.io/hosting-cluster-name";
    pub const CREATED_VIA: &str = "open-cluster-management/created-via";
}

/// Condition types, reasons and messages
pub mod conditions {
    pub const STATUS_TRUE: &str = "True";
    pub const STATUS_FALSE: &str = "False";

    pub const AVAILABLE: &str = "Available";
    pub const AS_EXPECTED: &str = "AsExpected";
    pub const HCP_AVAILABLE_MESSAGE: &str = "The hosted control plane is available";

    pub const MANAGED_CLUSTER_AVAILABLE: &str = "ManagedClusterConditionAvailable";

    pub const PREHOOK_JOB: &str = "prehook-ansiblejob";
    pub const POSTHOOK_JOB: &str = "posthook-ansiblejob";
    pub const CURRENT_ANSIBLE_JOB: &str = "current-ansiblejob";
    pub const PROVISIONING_JOB: &str = "hypershift-provisioning-job";
    pub const UNINSTALLING_JOB: &str = "hypershift-uninstalling-job";
    pub const CURATOR_JOB: &str = "clustercurator-job";
    pub const JOB_HAS_FINISHED: &str = "Job_has_finished";
    pub const INIT_CONTAINER_DONE: &str = "Completed executing init container";
}

/// Poll timing
pub mod poll {
    use std::time::Duration;

    pub const INTERVAL: Duration = Duration::from_secs(5);
    pub const UPGRADE_INTERVAL: Duration = Duration::from_secs(15);
    /// Default deadline for helper waits
    pub const TIMEOUT: Duration = Duration::from_secs(15 * 60);
    /// Deadline for long scenario steps (CLI runs, curator jobs)
    pub const SCENARIO_TIMEOUT: Duration = Duration::from_secs(30 * 60);
    pub const SHORT_TIMEOUT: Duration = Duration::from_secs(10 * 60);
    pub const CHANNEL_UPGRADE_TIMEOUT: Duration = Duration::from_secs(15 * 60);
    pub const CONTROL_PLANE_UPGRADE_TIMEOUT: Duration = Duration::from_secs(20 * 60);
    pub const NODEPOOL_UPGRADE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
    pub const POD_ROTATION_TIMEOUT: Duration = Duration::from_secs(5 * 60);
    pub const POD_ROTATION_INTERVAL: Duration = Duration::from_secs(2);
    pub const CLI_VERSION_TIMEOUT: Duration = Duration::from_secs(60);
}
