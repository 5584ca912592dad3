//! Profile resolution
//!
//! Parses a `key=value` profile, validates the key against the profile store
//! and normalizes the value for keys that need it. Normalization never edits
//! the base tree directly; it appends override expressions that flow through
//! the merger together with the user's overrides.

use crate::error::{ProfileError, Result};
use crate::paths;
use crate::store::ProfileStore;
use edgeadm_types::constants::HELM_SUPPORTED_MIN_VERSION;
use edgeadm_types::{OverrideExpression, ProfileExpression, ProfileKey, ValueTree};
use semver::Version;
use std::sync::Arc;
use tracing::debug;

/// Oldest release installable through charts, as a semantic version
pub const HELM_SUPPORTED_MIN: Version = Version::new(1, 10, 0);

/// iptables manager deployment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IptablesMgrMode {
    Internal,
    External,
}

impl IptablesMgrMode {
    /// Map a profile value to a mode.
    ///
    /// Unknown values fall back to `External` without an error. This keeps
    /// the installer's historical permissive behaviour.
    pub fn coerce(value: &str) -> Self {
        match value {
            "internal" => IptablesMgrMode::Internal,
            "external" => IptablesMgrMode::External,
            other => {
                debug!(value = other, "Unknown iptables manager mode, using external");
                IptablesMgrMode::External
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IptablesMgrMode::Internal => "internal",
            IptablesMgrMode::External => "external",
        }
    }
}

/// Outcome of resolving a profile expression
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProfile {
    pub key: ProfileKey,
    /// Value as given in the expression
    pub value: String,
    /// Values document of the key, before overrides
    pub base: ValueTree,
}

/// Resolves profile expressions against a store
pub struct ProfileResolver {
    store: Arc<dyn ProfileStore>,
    min_version: Version,
}

impl ProfileResolver {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            min_version: HELM_SUPPORTED_MIN,
        }
    }

    /// Override the minimum version accepted for `version=v...` profiles
    pub fn with_min_version(mut self, min_version: Version) -> Self {
        self.min_version = min_version;
        self
    }

    pub fn min_version(&self) -> &Version {
        &self.min_version
    }

    /// Resolve `expression`, appending synthesized overrides to `pending`.
    ///
    /// An empty expression resolves the default `version` profile.
    pub fn resolve(&self, expression: &str, pending: &mut Vec<String>) -> Result<ResolvedProfile> {
        let expression = if expression.is_empty() {
            format!("{}={}", ProfileKey::VERSION, HELM_SUPPORTED_MIN_VERSION)
        } else {
            expression.to_string()
        };

        let parsed = ProfileExpression::split(&expression)
            .filter(|parsed| !parsed.key.is_empty())
            .ok_or_else(|| ProfileError::InvalidProfileFormat(expression.clone()))?;

        let valid_keys = self.store.list_profiles()?;
        if !valid_keys.contains(&parsed.key) {
            return Err(ProfileError::UnsupportedProfile(expression));
        }

        let key = ProfileKey::from(parsed.key.as_str());
        let synthesized = self.normalize(&key, &parsed.value)?;
        debug!(
            profile = %key,
            overrides = synthesized.len(),
            "Profile normalized"
        );
        pending.extend(synthesized.iter().map(ToString::to_string));

        let base = ValueTree::from_yaml(&self.store.load_values(&parsed.key)?)?;

        Ok(ResolvedProfile {
            key,
            value: parsed.value,
            base,
        })
    }

    fn normalize(&self, key: &ProfileKey, value: &str) -> Result<Vec<OverrideExpression>> {
        match key {
            ProfileKey::Version => self.version_overrides(value),
            ProfileKey::IptablesMgrMode => {
                let mode = IptablesMgrMode::coerce(value);
                Ok(vec![OverrideExpression::new(
                    paths::IPTABLES_MGR_MODE,
                    mode.as_str(),
                )])
            }
            ProfileKey::Edgemesh | ProfileKey::Addon(_) => Ok(Vec::new()),
        }
    }

    fn version_overrides(&self, value: &str) -> Result<Vec<OverrideExpression>> {
        let tag = match value.strip_prefix('v') {
            Some(suffix) => {
                let version = Version::parse(suffix).map_err(|source| {
                    ProfileError::InvalidVersion {
                        value: value.to_string(),
                        source,
                    }
                })?;
                if version < self.min_version {
                    return Err(ProfileError::UnsupportedVersion {
                        version: value.to_string(),
                        minimum: format!("v{}", self.min_version),
                    });
                }
                format!("v{}", suffix)
            }
            // Unprefixed values are taken as opaque image tags
            None => value.to_string(),
        };

        Ok(vec![
            OverrideExpression::new(paths::CLOUDCORE_IMAGE_TAG, tag.clone()),
            OverrideExpression::new(paths::IPTABLES_MGR_IMAGE_TAG, tag),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BuiltinProfileStore;

    fn resolver() -> ProfileResolver {
        ProfileResolver::new(Arc::new(BuiltinProfileStore)).with_min_version(Version::new(1, 3, 0))
    }

    #[test]
    fn test_min_version_matches_constant() {
        assert_eq!(format!("v{}", HELM_SUPPORTED_MIN), HELM_SUPPORTED_MIN_VERSION);
    }

    #[test]
    fn test_known_keys_resolve() {
        for expression in ["version=v1.12.0", "iptablesMgrMode=internal", "edgemesh=enable"] {
            let mut pending = Vec::new();
            let resolved = resolver().resolve(expression, &mut pending).unwrap();
            assert!(!resolved.base.is_empty(), "{} has an empty base", expression);
        }
    }

    #[test]
    fn test_missing_separator_is_invalid_format() {
        let mut pending = Vec::new();
        let err = resolver().resolve("version", &mut pending).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidProfileFormat(_)));

        let err = resolver().resolve("=v1.12.0", &mut pending).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidProfileFormat(_)));
        assert!(pending.is_empty());
    }

    #[test]
    fn test_unknown_key_is_unsupported() {
        let mut pending = Vec::new();
        let err = resolver().resolve("sedna=enable", &mut pending).unwrap_err();
        assert!(matches!(err, ProfileError::UnsupportedProfile(_)));
    }

    #[test]
    fn test_version_below_minimum() {
        let mut pending = Vec::new();
        let err = resolver().resolve("version=v1.0.0", &mut pending).unwrap_err();
        assert!(matches!(err, ProfileError::UnsupportedVersion { .. }));
        assert!(pending.is_empty());
    }

    #[test]
    fn test_version_synthesizes_both_tags() {
        let mut pending = vec!["user.value=1".to_string()];
        resolver().resolve("version=v1.5.0", &mut pending).unwrap();
        assert_eq!(
            pending,
            vec![
                "user.value=1".to_string(),
                "cloudCore.image.tag=v1.5.0".to_string(),
                "iptablesManager.image.tag=v1.5.0".to_string(),
            ]
        );
    }

    #[test]
    fn test_unprefixed_version_is_verbatim() {
        let mut pending = Vec::new();
        resolver().resolve("version=latest", &mut pending).unwrap();
        assert_eq!(
            pending,
            vec![
                "cloudCore.image.tag=latest".to_string(),
                "iptablesManager.image.tag=latest".to_string(),
            ]
        );
    }

    #[test]
    fn test_malformed_prefixed_version() {
        let mut pending = Vec::new();
        let err = resolver().resolve("version=v1.x", &mut pending).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidVersion { .. }));
    }

    #[test]
    fn test_iptables_mode_coerced() {
        let mut pending = Vec::new();
        resolver()
            .resolve("iptablesMgrMode=bogus", &mut pending)
            .unwrap();
        assert_eq!(pending, vec!["iptablesManager.mode=external".to_string()]);

        let mut pending = Vec::new();
        resolver()
            .resolve("iptablesMgrMode=internal", &mut pending)
            .unwrap();
        assert_eq!(pending, vec!["iptablesManager.mode=internal".to_string()]);
    }

    #[test]
    fn test_empty_expression_uses_default_version() {
        let mut pending = Vec::new();
        let resolved = ProfileResolver::new(Arc::new(BuiltinProfileStore))
            .resolve("", &mut pending)
            .unwrap();
        assert_eq!(resolved.key, ProfileKey::Version);
        assert_eq!(resolved.value, HELM_SUPPORTED_MIN_VERSION);
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn test_edgemesh_adds_nothing() {
        let mut pending = Vec::new();
        let resolved = resolver().resolve("edgemesh=on", &mut pending).unwrap();
        assert_eq!(resolved.key, ProfileKey::Edgemesh);
        assert!(pending.is_empty());
    }
}
