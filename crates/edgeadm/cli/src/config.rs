//! CLI configuration
//!
//! Values are taken from command-line flags first, then this file, then the
//! built-in defaults.

use crate::error::{CliError, CliResult};
use edgeadm_types::constants::{
    DEFAULT_HELM_TIMEOUT, DEFAULT_KUBE_CONFIG, EDGECORE_CONFIG_PATH, SYSTEM_NAMESPACE,
};
use edgeadm_types::Region;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where chart directories are looked up when nothing else is configured
pub const DEFAULT_CHARTS_DIR: &str = "/etc/kubeedge/charts";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// kubeconfig used by helm and kubectl
    pub kube_config: Option<PathBuf>,

    /// Namespace the cloud components are installed into
    pub namespace: Option<String>,

    /// Root holding `cloudcore/`, `edgemesh/` and `addons/<name>/` charts
    pub charts_dir: Option<PathBuf>,

    /// Root holding `profiles/<key>.yaml`; builtin profiles when unset
    pub profiles_dir: Option<PathBuf>,

    /// Where the edgecore configuration is written
    pub edge_config_path: Option<PathBuf>,

    /// Download region (zh or en)
    pub region: Option<Region>,

    pub helm_binary: Option<PathBuf>,

    pub kubectl_binary: Option<PathBuf>,

    /// Readiness wait for chart upgrades and installs
    pub wait_timeout_seconds: Option<u64>,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => match Self::default_config_path() {
                Some(p) => p,
                None => return Ok(CliConfig::default()),
            },
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            toml::from_str(&contents)
                .map_err(|e| CliError::Config(format!("{}: {}", config_path.display(), e)))
        } else {
            Ok(CliConfig::default())
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("edgeadm").join("config.toml"))
    }

    pub fn kube_config(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.kube_config.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_KUBE_CONFIG))
    }

    pub fn namespace(&self, flag: Option<String>) -> String {
        flag.filter(|ns| !ns.is_empty())
            .or_else(|| self.namespace.clone())
            .unwrap_or_else(|| SYSTEM_NAMESPACE.to_string())
    }

    pub fn charts_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.charts_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CHARTS_DIR))
    }

    pub fn profiles_dir(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.profiles_dir.clone())
    }

    pub fn edge_config_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.edge_config_path.clone())
            .unwrap_or_else(|| PathBuf::from(EDGECORE_CONFIG_PATH))
    }

    pub fn region(&self, flag: Option<Region>) -> Region {
        flag.or(self.region).unwrap_or_default()
    }

    pub fn helm_binary(&self) -> PathBuf {
        self.helm_binary
            .clone()
            .unwrap_or_else(|| PathBuf::from("helm"))
    }

    pub fn kubectl_binary(&self) -> PathBuf {
        self.kubectl_binary
            .clone()
            .unwrap_or_else(|| PathBuf::from("kubectl"))
    }

    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_HELM_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.namespace(None), "kubeedge");
        assert_eq!(config.kube_config(None), PathBuf::from("/root/.kube/config"));
        assert_eq!(config.region(None), Region::Zh);
        assert_eq!(config.wait_timeout(), Duration::from_secs(60));
        assert!(config.profiles_dir(None).is_none());
    }

    #[test]
    fn test_load_missing_config() {
        let config = CliConfig::load(Some("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_flags_beat_file_beat_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "namespace = \"edge-system\"\nregion = \"en\"\nwait_timeout_seconds = 120\n",
        )
        .unwrap();

        let config = CliConfig::load(path.to_str()).unwrap();
        assert_eq!(config.namespace(None), "edge-system");
        assert_eq!(config.namespace(Some("custom".into())), "custom");
        assert_eq!(config.region(None), Region::En);
        assert_eq!(config.wait_timeout(), Duration::from_secs(120));
        assert_eq!(
            config.edge_config_path(None),
            PathBuf::from("/etc/kubeedge/config/edgecore.yaml")
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "endpoint = \"http://localhost\"\n").unwrap();
        assert!(matches!(
            CliConfig::load(path.to_str()),
            Err(CliError::Config(_))
        ));
    }
}
