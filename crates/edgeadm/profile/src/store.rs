//! Profile store accessors
//!
//! A profile store answers two questions: which profile keys exist, and what
//! raw values document belongs to a key. Profiles ship with the binary and
//! can be replaced by a directory on disk.

use crate::error::{ProfileError, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Source of profile keys and their values documents
pub trait ProfileStore: Send + Sync {
    /// Every valid profile key
    fn list_profiles(&self) -> Result<BTreeSet<String>>;

    /// Raw values document for `key`
    fn load_values(&self, key: &str) -> Result<String>;
}

const BUILTIN_PROFILES: &[(&str, &str)] = &[
    ("version", include_str!("../profiles/version.yaml")),
    ("iptablesMgrMode", include_str!("../profiles/iptablesMgrMode.yaml")),
    ("edgemesh", include_str!("../profiles/edgemesh.yaml")),
];

/// Profiles compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProfileStore;

impl ProfileStore for BuiltinProfileStore {
    fn list_profiles(&self) -> Result<BTreeSet<String>> {
        Ok(BUILTIN_PROFILES
            .iter()
            .map(|(key, _)| key.to_string())
            .collect())
    }

    fn load_values(&self, key: &str) -> Result<String> {
        BUILTIN_PROFILES
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, values)| values.to_string())
            .ok_or_else(|| ProfileError::Store(format!("profile {} is not built in", key)))
    }
}

/// Profiles read from `<root>/profiles/<key>.yaml`
#[derive(Debug, Clone)]
pub struct DirProfileStore {
    root: PathBuf,
}

impl DirProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn profiles_dir(&self) -> PathBuf {
        self.root.join("profiles")
    }

    fn values_path(&self, key: &str) -> Option<PathBuf> {
        ["yaml", "yml"]
            .iter()
            .map(|ext| self.profiles_dir().join(format!("{}.{}", key, ext)))
            .find(|path| path.is_file())
    }
}

impl ProfileStore for DirProfileStore {
    fn list_profiles(&self) -> Result<BTreeSet<String>> {
        let dir = self.profiles_dir();
        let entries = std::fs::read_dir(&dir).map_err(|e| {
            ProfileError::Store(format!("cannot list profiles in {}: {}", dir.display(), e))
        })?;

        let mut keys = BTreeSet::new();
        for entry in entries {
            let path = entry?.path();
            let is_values = matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("yaml") | Some("yml")
            );
            if !is_values {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.insert(stem.to_string());
            }
        }
        Ok(keys)
    }

    fn load_values(&self, key: &str) -> Result<String> {
        let path = self.values_path(key).ok_or_else(|| {
            ProfileError::Store(format!(
                "profile {} not found in {}",
                key,
                self.profiles_dir().display()
            ))
        })?;
        debug!(path = %path.display(), "Loading profile values");
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Profiles from `root` when given, otherwise the built-in set
pub fn profile_store(root: Option<&Path>) -> Arc<dyn ProfileStore> {
    match root {
        Some(root) => Arc::new(DirProfileStore::new(root)),
        None => Arc::new(BuiltinProfileStore),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgeadm_types::ValueTree;

    #[test]
    fn test_builtin_profiles_parse() {
        let store = BuiltinProfileStore;
        let keys = store.list_profiles().unwrap();
        assert_eq!(keys.len(), 3);
        for key in keys {
            let tree = ValueTree::from_yaml(&store.load_values(&key).unwrap()).unwrap();
            assert!(!tree.is_empty(), "profile {} is empty", key);
        }
    }

    #[test]
    fn test_builtin_unknown_key() {
        assert!(matches!(
            BuiltinProfileStore.load_values("sedna"),
            Err(ProfileError::Store(_))
        ));
    }

    #[test]
    fn test_dir_store_lists_values_files_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let profiles = temp_dir.path().join("profiles");
        std::fs::create_dir_all(&profiles).unwrap();
        std::fs::write(profiles.join("sedna.yaml"), "sedna:\n  enable: true\n").unwrap();
        std::fs::write(profiles.join("kuiper.yml"), "kuiper: {}\n").unwrap();
        std::fs::write(profiles.join("README.md"), "not a profile").unwrap();

        let store = DirProfileStore::new(temp_dir.path());
        let keys = store.list_profiles().unwrap();
        assert_eq!(
            keys.into_iter().collect::<Vec<_>>(),
            vec!["kuiper".to_string(), "sedna".to_string()]
        );
        assert!(store.load_values("kuiper").unwrap().contains("kuiper"));
        assert!(store.load_values("README").is_err());
    }

    #[test]
    fn test_dir_store_missing_directory() {
        let store = DirProfileStore::new("/nonexistent/edgeadm/charts");
        assert!(matches!(store.list_profiles(), Err(ProfileError::Store(_))));
    }
}
