//! Artifact installation inputs

use crate::constants::{CLOUDCORE_BINARY, EDGECORE_BINARY};
use crate::region::{DownloadEndpoints, Region};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Component whose artifacts are installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    EdgeCore,
    CloudCore,
}

impl ComponentType {
    /// Process name of the component's daemon
    pub fn binary_name(&self) -> &'static str {
        match self {
            ComponentType::EdgeCore => EDGECORE_BINARY,
            ComponentType::CloudCore => CLOUDCORE_BINARY,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}

/// Release architecture name for the running host
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        other => other,
    }
}

/// Input to the external download/install collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOptions {
    /// Directory holding a pre-downloaded release tarball
    pub tarball_path: Option<PathBuf>,
    pub component_type: ComponentType,
    /// KubeEdge release to install
    pub version: Version,
    pub region: Region,
    pub arch: String,
}

impl InstallOptions {
    pub fn new(component_type: ComponentType, version: Version, region: Region) -> Self {
        Self {
            tarball_path: None,
            component_type,
            version,
            region,
            arch: host_arch().to_string(),
        }
    }

    pub fn with_tarball_path(mut self, path: Option<PathBuf>) -> Self {
        self.tarball_path = path;
        self
    }

    /// `kubeedge-v<version>-linux-<arch>.tar.gz`
    pub fn tarball_name(&self) -> String {
        format!("kubeedge-v{}-linux-{}.tar.gz", self.version, self.arch)
    }

    /// Where the release tarball is published for the selected region
    pub fn download_url(&self) -> String {
        DownloadEndpoints::for_region(self.region)
            .release_asset_url(&self.version.to_string(), &self.tarball_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> InstallOptions {
        InstallOptions {
            arch: "arm64".to_string(),
            ..InstallOptions::new(ComponentType::EdgeCore, Version::new(1, 12, 1), Region::En)
        }
    }

    #[test]
    fn test_tarball_name_carries_version_and_arch() {
        assert_eq!(options().tarball_name(), "kubeedge-v1.12.1-linux-arm64.tar.gz");
    }

    #[test]
    fn test_download_url_follows_region() {
        assert_eq!(
            options().download_url(),
            "https://github.com/kubeedge/kubeedge/releases/download/v1.12.1/kubeedge-v1.12.1-linux-arm64.tar.gz"
        );
        let zh = InstallOptions {
            region: Region::Zh,
            ..options()
        };
        assert!(zh
            .download_url()
            .starts_with("https://kubeedge.pek3b.qingstor.com/releases/download/v1.12.1/"));
    }

    #[test]
    fn test_host_arch_uses_release_names() {
        assert_ne!(host_arch(), "x86_64");
        assert_ne!(host_arch(), "aarch64");
    }
}
