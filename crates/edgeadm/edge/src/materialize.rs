//! Edge Config Materializer
//!
//! Builds an [`EdgeCoreConfig`] from connection parameters, validates it and
//! writes it out. Nothing is written unless validation passes, and identical
//! inputs always produce byte-identical files.

use crate::config::{CGroupDriver, EdgeCoreConfig, HostIdentity, Taint};
use crate::error::{EdgeConfigError, Result};
use crate::validation;
use edgeadm_types::constants::{
    DEFAULT_HTTP_PORT, DEFAULT_QUIC_PORT, DEFAULT_TUNNEL_PORT, EDGECORE_CONFIG_PATH,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// How an edge node reaches the cloud and identifies itself
///
/// Unset fields keep the defaults of [`EdgeCoreConfig::new_default`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeConnectParams {
    /// Cloud hub websocket address, `host:port`
    pub cloudcore_address: String,
    pub token: Option<String>,
    pub cert_port: Option<u16>,
    pub quic_port: Option<u16>,
    pub tunnel_port: Option<u16>,
    pub node_name: Option<String>,
    pub node_ip: Option<String>,
    pub runtime_type: Option<String>,
    pub remote_runtime_endpoint: Option<String>,
    pub cgroup_driver: Option<String>,
    /// `key=value` node labels
    pub labels: Vec<String>,
    pub with_default_taint: bool,
}

/// Split `key=value` labels on the first `=`
pub fn parse_labels(labels: &[String]) -> Result<BTreeMap<String, String>> {
    labels
        .iter()
        .map(|label| {
            label
                .split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| EdgeConfigError::InvalidLabel(label.clone()))
        })
        .collect()
}

/// Apply `params` on top of the defaults for `host`
pub fn build_config(params: &EdgeConnectParams, host: &HostIdentity) -> Result<EdgeCoreConfig> {
    let mut config = EdgeCoreConfig::new_default(host);
    let cloud_host = params
        .cloudcore_address
        .split(':')
        .next()
        .unwrap_or_default();

    let hub = &mut config.modules.edge_hub;
    hub.websocket.server = params.cloudcore_address.clone();
    hub.http_server = format!(
        "https://{}:{}",
        cloud_host,
        params.cert_port.unwrap_or(DEFAULT_HTTP_PORT)
    );
    hub.quic.server = format!("{}:{}", cloud_host, params.quic_port.unwrap_or(DEFAULT_QUIC_PORT));
    if let Some(token) = params.token.as_ref().filter(|t| !t.is_empty()) {
        hub.token = token.clone();
    }

    config.modules.edge_stream.tunnel_server = format!(
        "{}:{}",
        cloud_host,
        params.tunnel_port.unwrap_or(DEFAULT_TUNNEL_PORT)
    );

    let edged = &mut config.modules.edged;
    if let Some(name) = params.node_name.as_ref().filter(|n| !n.is_empty()) {
        edged.hostname_override = name.clone();
    }
    if let Some(ip) = params.node_ip.as_ref().filter(|ip| !ip.is_empty()) {
        edged.node_ip = ip.clone();
    }
    if let Some(runtime) = params.runtime_type.as_ref().filter(|r| !r.is_empty()) {
        edged.runtime_type = runtime.clone();
    }
    if let Some(endpoint) = params.remote_runtime_endpoint.as_ref().filter(|e| !e.is_empty()) {
        edged.remote_runtime_endpoint = endpoint.clone();
        edged.remote_image_endpoint = endpoint.clone();
    }
    if let Some(driver) = params.cgroup_driver.as_ref().filter(|d| !d.is_empty()) {
        edged.cgroup_driver = driver.parse::<CGroupDriver>()?;
    }
    if params.with_default_taint {
        edged.taints.push(Taint::edge_default());
    }
    if !params.labels.is_empty() {
        edged.labels = parse_labels(&params.labels)?;
    }

    Ok(config)
}

/// Writes validated EdgeCore configuration files
#[derive(Debug, Clone)]
pub struct EdgeConfigMaterializer {
    path: PathBuf,
}

impl Default for EdgeConfigMaterializer {
    fn default() -> Self {
        Self::new(EDGECORE_CONFIG_PATH)
    }
}

impl EdgeConfigMaterializer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build, validate and persist the configuration
    #[instrument(skip(self, params, host), fields(path = %self.path.display()))]
    pub fn materialize(
        &self,
        params: &EdgeConnectParams,
        host: &HostIdentity,
    ) -> Result<EdgeCoreConfig> {
        let config = build_config(params, host)?;

        let errors = validation::validate(&config);
        if !errors.is_empty() {
            return Err(EdgeConfigError::ValidationFailed(errors.join("\n")));
        }

        self.persist(&config)?;
        info!(
            node = %config.modules.edged.hostname_override,
            server = %config.modules.edge_hub.websocket.server,
            "EdgeCore configuration written"
        );
        Ok(config)
    }

    fn persist(&self, config: &EdgeCoreConfig) -> Result<()> {
        let yaml = config.to_yaml()?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| EdgeConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, yaml).map_err(|source| EdgeConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Configuration persisted");
        Ok(())
    }
}
