//! Region-selected download endpoints
//!
//! Endpoints are derived from the region at call time instead of being kept
//! in mutable process-wide defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Download region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Mirror hosted in mainland China
    #[default]
    Zh,
    /// GitHub releases
    En,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Zh => f.write_str("zh"),
            Region::En => f.write_str("en"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown region: {0} (expected zh or en)")]
pub struct RegionParseError(pub String);

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zh" => Ok(Region::Zh),
            "en" => Ok(Region::En),
            other => Err(RegionParseError(other.to_string())),
        }
    }
}

/// Where release artifacts and version information are fetched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadEndpoints {
    /// Base URL of release tarballs; `<base>/v<version>/<asset>`
    pub release_download_url: String,
    /// Plain-text document holding the latest release tag
    pub latest_version_url: String,
}

impl DownloadEndpoints {
    pub fn for_region(region: Region) -> Self {
        match region {
            Region::Zh => Self {
                release_download_url: "https://kubeedge.pek3b.qingstor.com/releases/download"
                    .to_string(),
                latest_version_url: "https://kubeedge.io/latestversion".to_string(),
            },
            Region::En => Self {
                release_download_url: "https://github.com/kubeedge/kubeedge/releases/download"
                    .to_string(),
                latest_version_url: "https://kubeedge.io/latestversion".to_string(),
            },
        }
    }

    /// URL of a release asset for `version` (without the leading `v`)
    pub fn release_asset_url(&self, version: &str, asset: &str) -> String {
        format!("{}/v{}/{}", self.release_download_url, version, asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parse() {
        assert_eq!("en".parse::<Region>().unwrap(), Region::En);
        assert_eq!("ZH".parse::<Region>().unwrap(), Region::Zh);
        assert!("us".parse::<Region>().is_err());
    }

    #[test]
    fn test_endpoints_are_pure_per_region() {
        let en = DownloadEndpoints::for_region(Region::En);
        assert_eq!(
            en.release_asset_url("1.12.1", "kubeedge-v1.12.1-linux-amd64.tar.gz"),
            "https://github.com/kubeedge/kubeedge/releases/download/v1.12.1/kubeedge-v1.12.1-linux-amd64.tar.gz"
        );
        assert_ne!(DownloadEndpoints::for_region(Region::Zh), en);
        assert_eq!(DownloadEndpoints::for_region(Region::En), en);
    }
}
