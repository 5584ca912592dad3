//! EdgeCore configuration document
//!
//! Field names follow edgecore's own YAML schema (camelCase). Maps use
//! `BTreeMap` so the serialized document is stable across runs.

use edgeadm_types::constants::{
    DEFAULT_HTTP_PORT, DEFAULT_QUIC_PORT, DEFAULT_TUNNEL_PORT, EDGE_NODE_TAINT_KEY,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::EdgeConfigError;

pub const API_VERSION: &str = "edgecore.config.kubeedge.io/v1alpha1";
pub const KIND: &str = "EdgeCore";

const DEFAULT_CLOUD_HOST: &str = "127.0.0.1";
const DEFAULT_WEBSOCKET_PORT: u16 = 10000;
const DEFAULT_RUNTIME_ENDPOINT: &str = "unix:///var/run/dockershim.sock";
const DEFAULT_DATA_SOURCE: &str = "/var/lib/kubeedge/edgecore.db";

/// Runtime that needs an explicit CRI endpoint
pub const REMOTE_RUNTIME: &str = "remote";

/// Identity of the host the configuration is generated on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub hostname: String,
    pub node_ip: String,
}

impl HostIdentity {
    pub fn new(hostname: impl Into<String>, node_ip: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            node_ip: node_ip.into(),
        }
    }

    /// Read the local hostname and the address of the default route
    pub fn detect() -> Result<Self, EdgeConfigError> {
        let hostname = hostname::get()
            .map_err(EdgeConfigError::Hostname)?
            .to_string_lossy()
            .to_lowercase();
        let node_ip = outbound_ip().unwrap_or_else(|| DEFAULT_CLOUD_HOST.to_string());
        Ok(Self { hostname, node_ip })
    }
}

// connect() on UDP sends nothing; it only selects the outbound interface
fn outbound_ip() -> Option<String> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|addr| addr.ip().to_string())
}

/// Cgroup driver shared by edged and the container runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CGroupDriver {
    #[default]
    Cgroupfs,
    Systemd,
}

impl fmt::Display for CGroupDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CGroupDriver::Cgroupfs => f.write_str("cgroupfs"),
            CGroupDriver::Systemd => f.write_str("systemd"),
        }
    }
}

impl FromStr for CGroupDriver {
    type Err = EdgeConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cgroupfs" => Ok(CGroupDriver::Cgroupfs),
            "systemd" => Ok(CGroupDriver::Systemd),
            other => Err(EdgeConfigError::UnsupportedCGroupDriver(other.to_string())),
        }
    }
}

/// Node taint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taint {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub effect: String,
}

impl Taint {
    /// `node-role.kubernetes.io/edge:NoSchedule`
    pub fn edge_default() -> Self {
        Self {
            key: EDGE_NODE_TAINT_KEY.to_string(),
            value: None,
            effect: "NoSchedule".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeCoreConfig {
    pub api_version: String,
    pub kind: String,
    pub database: Database,
    pub modules: Modules,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    pub driver_name: String,
    pub data_source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modules {
    pub edge_hub: EdgeHub,
    pub edged: Edged,
    pub edge_stream: EdgeStream,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeHub {
    pub enable: bool,
    pub heartbeat: u32,
    pub http_server: String,
    pub token: String,
    pub websocket: HubTransport,
    pub quic: HubTransport,
}

/// Websocket or QUIC connection to the cloud hub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubTransport {
    pub enable: bool,
    pub server: String,
    pub handshake_timeout: u32,
    pub read_deadline: u32,
    pub write_deadline: u32,
}

impl HubTransport {
    fn new(enable: bool, server: String) -> Self {
        Self {
            enable,
            server,
            handshake_timeout: 30,
            read_deadline: 15,
            write_deadline: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edged {
    pub enable: bool,
    pub hostname_override: String,
    #[serde(rename = "nodeIP")]
    pub node_ip: String,
    pub runtime_type: String,
    pub remote_runtime_endpoint: String,
    pub remote_image_endpoint: String,
    pub cgroup_driver: CGroupDriver,
    #[serde(default)]
    pub taints: Vec<Taint>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStream {
    pub enable: bool,
    pub tunnel_server: String,
}

impl EdgeCoreConfig {
    /// Default document for `host`, pointing at a local cloud hub
    pub fn new_default(host: &HostIdentity) -> Self {
        let endpoint = |port: u16| format!("{}:{}", DEFAULT_CLOUD_HOST, port);
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            database: Database {
                driver_name: "sqlite3".to_string(),
                data_source: DEFAULT_DATA_SOURCE.to_string(),
            },
            modules: Modules {
                edge_hub: EdgeHub {
                    enable: true,
                    heartbeat: 15,
                    http_server: format!("https://{}", endpoint(DEFAULT_HTTP_PORT)),
                    token: String::new(),
                    websocket: HubTransport::new(true, endpoint(DEFAULT_WEBSOCKET_PORT)),
                    quic: HubTransport::new(false, endpoint(DEFAULT_QUIC_PORT)),
                },
                edged: Edged {
                    enable: true,
                    hostname_override: host.hostname.clone(),
                    node_ip: host.node_ip.clone(),
                    runtime_type: "docker".to_string(),
                    remote_runtime_endpoint: DEFAULT_RUNTIME_ENDPOINT.to_string(),
                    remote_image_endpoint: DEFAULT_RUNTIME_ENDPOINT.to_string(),
                    cgroup_driver: CGroupDriver::default(),
                    taints: Vec::new(),
                    labels: BTreeMap::new(),
                },
                edge_stream: EdgeStream {
                    enable: false,
                    tunnel_server: endpoint(DEFAULT_TUNNEL_PORT),
                },
            },
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
