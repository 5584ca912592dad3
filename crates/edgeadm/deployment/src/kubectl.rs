//! kubectl-backed cluster probe

use crate::backend::{ClusterProbe, ProbeError};
use async_trait::async_trait;
use semver::Version;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionReport {
    server_version: Option<ServerVersion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerVersion {
    #[serde(default)]
    major: String,
    #[serde(default)]
    minor: String,
    #[serde(default)]
    git_version: String,
}

/// Reads the server version from `kubectl version -o json`
#[derive(Debug, Clone)]
pub struct KubectlProbe {
    binary: PathBuf,
    kube_config: Option<PathBuf>,
}

impl Default for KubectlProbe {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("kubectl"),
            kube_config: None,
        }
    }
}

impl KubectlProbe {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            kube_config: None,
        }
    }

    pub fn with_kube_config(mut self, kube_config: impl Into<PathBuf>) -> Self {
        self.kube_config = Some(kube_config.into());
        self
    }
}

/// Extract the server version from kubectl's JSON report
///
/// `gitVersion` is preferred; managed clusters report `minor` values such as
/// `"22+"`, so the major/minor fallback strips non-digits.
pub fn parse_server_version(json: &str) -> Result<Version, ProbeError> {
    let report: VersionReport =
        serde_json::from_str(json).map_err(|e| ProbeError::InvalidVersion(e.to_string()))?;
    let server = report
        .server_version
        .ok_or_else(|| ProbeError::Unreachable("kubectl reported no server version".to_string()))?;

    let git = server.git_version.trim_start_matches('v');
    if let Ok(version) = Version::parse(git) {
        return Ok(version);
    }

    let digits = |s: &str| s.chars().filter(char::is_ascii_digit).collect::<String>();
    let major = digits(&server.major).parse::<u64>();
    let minor = digits(&server.minor).parse::<u64>();
    match (major, minor) {
        (Ok(major), Ok(minor)) => Ok(Version::new(major, minor, 0)),
        _ => Err(ProbeError::InvalidVersion(server.git_version)),
    }
}

#[async_trait]
impl ClusterProbe for KubectlProbe {
    async fn server_version(&self) -> Result<Version, ProbeError> {
        let mut command = Command::new(&self.binary);
        command.args(["version", "-o", "json"]);
        if let Some(kube_config) = &self.kube_config {
            command.arg("--kubeconfig").arg(kube_config);
        }
        debug!(binary = %self.binary.display(), "Probing cluster version");

        let output = command.output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        // kubectl exits non-zero when the server is unreachable but still
        // prints the client half of the report
        match parse_server_version(&stdout) {
            Ok(version) => Ok(version),
            Err(_) if !output.status.success() => Err(ProbeError::Unreachable(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            )),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_git_version() {
        let json = r#"{
            "clientVersion": {"major": "1", "minor": "24", "gitVersion": "v1.24.1"},
            "serverVersion": {"major": "1", "minor": "22", "gitVersion": "v1.22.3"}
        }"#;
        assert_eq!(parse_server_version(json).unwrap(), Version::new(1, 22, 3));
    }

    #[test]
    fn test_parse_vendor_suffix() {
        let json = r#"{"serverVersion": {"major": "1", "minor": "21+", "gitVersion": "v1.21.14-eks-fb459a0"}}"#;
        let version = parse_server_version(json).unwrap();
        assert_eq!((version.major, version.minor, version.patch), (1, 21, 14));
    }

    #[test]
    fn test_fallback_to_major_minor() {
        let json = r#"{"serverVersion": {"major": "1", "minor": "19+", "gitVersion": "custom"}}"#;
        assert_eq!(parse_server_version(json).unwrap(), Version::new(1, 19, 0));
    }

    #[test]
    fn test_missing_server_version() {
        let json = r#"{"clientVersion": {"major": "1", "minor": "24", "gitVersion": "v1.24.1"}}"#;
        assert!(matches!(
            parse_server_version(json),
            Err(ProbeError::Unreachable(_))
        ));
        assert!(matches!(
            parse_server_version("not json"),
            Err(ProbeError::InvalidVersion(_))
        ));
    }
}
