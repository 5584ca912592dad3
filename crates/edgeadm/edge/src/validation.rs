//! EdgeCore configuration validation
//!
//! Every problem found is collected; the caller gets them all at once.

use crate::config::{EdgeCoreConfig, REMOTE_RUNTIME};
use std::net::IpAddr;

const TAINT_EFFECTS: [&str; 3] = ["NoSchedule", "PreferNoSchedule", "NoExecute"];
const DNS1123_SUBDOMAIN_MAX: usize = 253;
const LABEL_NAME_MAX: usize = 63;

/// Validate `config`, returning one message per problem
pub fn validate(config: &EdgeCoreConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let hub = &config.modules.edge_hub;
    let edged = &config.modules.edged;

    if !is_dns1123_subdomain(&edged.hostname_override) {
        errors.push(format!(
            "modules.edged.hostnameOverride: invalid value {:?}: must be a lowercase RFC 1123 subdomain",
            edged.hostname_override
        ));
    }
    if edged.node_ip.parse::<IpAddr>().is_err() {
        errors.push(format!(
            "modules.edged.nodeIP: invalid value {:?}: must be a valid IP address",
            edged.node_ip
        ));
    }

    for (field, server) in [
        ("modules.edgeHub.websocket.server", &hub.websocket.server),
        ("modules.edgeHub.quic.server", &hub.quic.server),
        ("modules.edgeStream.tunnelServer", &config.modules.edge_stream.tunnel_server),
    ] {
        if !is_host_port(server) {
            errors.push(format!("{}: invalid value {:?}: must be host:port", field, server));
        }
    }
    match hub.http_server.strip_prefix("https://") {
        Some(rest) if is_host_port(rest.trim_end_matches('/')) => {}
        _ => errors.push(format!(
            "modules.edgeHub.httpServer: invalid value {:?}: must be https://host:port",
            hub.http_server
        )),
    }

    if edged.runtime_type == REMOTE_RUNTIME && edged.remote_runtime_endpoint.is_empty() {
        errors.push(
            "modules.edged.remoteRuntimeEndpoint: required when runtimeType is remote".to_string(),
        );
    }

    for taint in &edged.taints {
        if taint.key.is_empty() {
            errors.push("modules.edged.taints: taint key must not be empty".to_string());
        }
        if !TAINT_EFFECTS.contains(&taint.effect.as_str()) {
            errors.push(format!(
                "modules.edged.taints: unsupported effect {:?} for key {:?}",
                taint.effect, taint.key
            ));
        }
    }

    for key in edged.labels.keys() {
        let name = key.rsplit_once('/').map_or(key.as_str(), |(_, name)| name);
        if name.is_empty() || name.len() > LABEL_NAME_MAX {
            errors.push(format!(
                "modules.edged.labels: invalid key {:?}: name part must be 1-{} characters",
                key, LABEL_NAME_MAX
            ));
        }
    }

    errors
}

fn is_dns1123_subdomain(value: &str) -> bool {
    if value.is_empty() || value.len() > DNS1123_SUBDOMAIN_MAX {
        return false;
    }
    value.split('.').all(|label| {
        let bytes = label.as_bytes();
        let alnum = |b: &u8| b.is_ascii_lowercase() || b.is_ascii_digit();
        match (bytes.first(), bytes.last()) {
            (Some(first), Some(last)) => {
                alnum(first) && alnum(last) && bytes.iter().all(|b| alnum(b) || *b == b'-')
            }
            _ => false,
        }
    })
}

fn is_host_port(value: &str) -> bool {
    match value.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && matches!(port.parse::<u16>(), Ok(p) if p > 0)
        }
        None => false,
    }
}
