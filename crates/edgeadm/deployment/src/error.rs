//! Deployment error types

use crate::backend::{ProbeError, ReleaseError};
use crate::process::ProcessError;
use std::fmt;
use thiserror::Error;

/// Which half of the apply protocol failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStage {
    Upgrade,
    Install,
}

impl fmt::Display for ApplyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyStage::Upgrade => f.write_str("upgrade"),
            ApplyStage::Install => f.write_str("install"),
        }
    }
}

/// Deployment errors
#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("{component} is already running on this node, please run reset to clean up first")]
    AlreadyRunning { component: String },

    #[error("Process inspection failed: {0}")]
    Process(#[from] ProcessError),

    #[error("Kubernetes control plane is not reachable: {0}")]
    ClusterUnreachable(#[from] ProbeError),

    #[error("Kubernetes version {found} is not supported, minimum is {minimum}")]
    UnsupportedClusterVersion { found: String, minimum: String },

    #[error("{stage} of {component} failed: {source}")]
    ApplyFailed {
        component: String,
        stage: ApplyStage,
        #[source]
        source: ReleaseError,
    },

    #[error("cannot render {component}: {source}")]
    Render {
        component: String,
        #[source]
        source: ReleaseError,
    },

    #[error("cannot read manifest {path}: {source}")]
    Manifest {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for deployment operations
pub type Result<T> = std::result::Result<T, DeploymentError>;
