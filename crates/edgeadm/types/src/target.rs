//! Deployment targets

use crate::values::ValueTree;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Opaque chart reference handed to the apply backend (a local directory or a repo reference)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartRef(String);

impl ChartRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Chart stored under `root/subdir`
    pub fn in_dir(root: &Path, subdir: &str) -> Self {
        Self(root.join(subdir).to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What is being deployed and where
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentTarget {
    /// Release name
    pub component_name: String,
    pub chart: ChartRef,
    pub namespace: String,
    pub values: ValueTree,
}

impl DeploymentTarget {
    pub fn new(
        component_name: impl Into<String>,
        chart: ChartRef,
        namespace: impl Into<String>,
        values: ValueTree,
    ) -> Self {
        Self {
            component_name: component_name.into(),
            chart,
            namespace: namespace.into(),
            values,
        }
    }
}
