//! Well-known names, ports, paths and versions

use std::time::Duration;

/// Namespace the cloud components are installed into by default
pub const SYSTEM_NAMESPACE: &str = "kubeedge";

/// Version used when the latest release cannot be discovered
pub const DEFAULT_EDGE_VERSION: &str = "1.10.0";

/// Oldest release that can be installed through charts
pub const HELM_SUPPORTED_MIN_VERSION: &str = "v1.10.0";

/// Oldest Kubernetes control plane the cloud components support
pub const K8S_MIN_SUPPORTED_VERSION: &str = "1.11.0";

/// Wait applied to chart upgrades and installs unless forced
pub const DEFAULT_HELM_TIMEOUT: Duration = Duration::from_secs(60);

/// Attempts made when discovering the latest release
pub const RETRY_TIMES: u32 = 5;

/// Default kubeconfig location
pub const DEFAULT_KUBE_CONFIG: &str = "/root/.kube/config";

/// Process names
pub const CLOUDCORE_BINARY: &str = "cloudcore";
pub const EDGECORE_BINARY: &str = "edgecore";

/// Default cloud hub ports seen from an edge node
pub const DEFAULT_QUIC_PORT: u16 = 10001;
pub const DEFAULT_HTTP_PORT: u16 = 10002;
pub const DEFAULT_TUNNEL_PORT: u16 = 10004;

/// Where edgecore reads its configuration
pub const EDGECORE_CONFIG_PATH: &str = "/etc/kubeedge/config/edgecore.yaml";

/// Taint applied to edge nodes when requested
pub const EDGE_NODE_TAINT_KEY: &str = "node-role.kubernetes.io/edge";

/// Separator placed between concatenated manifests
pub const YAML_SEPARATOR: &str = "---\n";
