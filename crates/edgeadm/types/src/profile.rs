//! Profile keys and expressions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Parsed `key=value` profile expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileExpression {
    pub key: String,
    pub value: String,
}

impl ProfileExpression {
    /// Split a profile expression on `=`.
    ///
    /// At least two parts are required; the value is the second part, so
    /// anything after a further `=` is ignored.
    pub fn split(expression: &str) -> Option<Self> {
        let mut parts = expression.split('=');
        let key = parts.next()?;
        let value = parts.next()?;
        Some(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Known profile keys
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKey {
    /// Release version of the cloud components
    Version,
    /// iptables manager deployment mode
    IptablesMgrMode,
    /// edgemesh add-on
    Edgemesh,
    /// Any other add-on shipped in the profile store
    Addon(String),
}

impl ProfileKey {
    pub const VERSION: &'static str = "version";
    pub const IPTABLES_MGR_MODE: &'static str = "iptablesMgrMode";
    pub const EDGEMESH: &'static str = "edgemesh";

    pub fn as_str(&self) -> &str {
        match self {
            ProfileKey::Version => Self::VERSION,
            ProfileKey::IptablesMgrMode => Self::IPTABLES_MGR_MODE,
            ProfileKey::Edgemesh => Self::EDGEMESH,
            ProfileKey::Addon(name) => name,
        }
    }

    /// Release name and chart directory for this key
    pub fn chart_location(&self) -> ChartLocation {
        match self {
            ProfileKey::Version | ProfileKey::IptablesMgrMode => ChartLocation {
                component: "cloudcore".to_string(),
                subdir: "cloudcore".to_string(),
            },
            ProfileKey::Edgemesh => ChartLocation {
                component: "edgemesh".to_string(),
                subdir: "edgemesh".to_string(),
            },
            ProfileKey::Addon(name) => ChartLocation {
                component: name.clone(),
                subdir: format!("addons/{}", name),
            },
        }
    }
}

impl From<&str> for ProfileKey {
    fn from(key: &str) -> Self {
        match key {
            Self::VERSION => ProfileKey::Version,
            Self::IPTABLES_MGR_MODE => ProfileKey::IptablesMgrMode,
            Self::EDGEMESH => ProfileKey::Edgemesh,
            other => ProfileKey::Addon(other.to_string()),
        }
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Release name and chart subdirectory for a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLocation {
    pub component: String,
    pub subdir: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_requires_separator() {
        assert!(ProfileExpression::split("version").is_none());
        let expr = ProfileExpression::split("version=v1.12.0").unwrap();
        assert_eq!(expr.key, "version");
        assert_eq!(expr.value, "v1.12.0");
    }

    #[test]
    fn test_split_keeps_second_part_only() {
        let expr = ProfileExpression::split("edgemesh=a=b").unwrap();
        assert_eq!(expr.value, "a");
    }

    #[test]
    fn test_key_round_trip() {
        for key in ["version", "iptablesMgrMode", "edgemesh", "sedna"] {
            assert_eq!(ProfileKey::from(key).as_str(), key);
        }
    }

    #[test]
    fn test_chart_locations() {
        assert_eq!(ProfileKey::Version.chart_location().component, "cloudcore");
        assert_eq!(ProfileKey::IptablesMgrMode.chart_location().subdir, "cloudcore");
        assert_eq!(ProfileKey::Edgemesh.chart_location().subdir, "edgemesh");
        let addon = ProfileKey::from("sedna").chart_location();
        assert_eq!(addon.component, "sedna");
        assert_eq!(addon.subdir, "addons/sedna");
    }
}
