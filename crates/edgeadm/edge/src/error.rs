//! Edge configuration error types

use edgeadm_deployment::ProcessError;
use std::path::PathBuf;
use thiserror::Error;

/// Artifact installation errors
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("release tarball not found at {0}")]
    MissingArtifacts(PathBuf),

    #[error("no tarball path given; download {url} and pass its directory with --tarballpath")]
    DownloadUnavailable { url: String },
}

/// Edge configuration errors
#[derive(Debug, Error)]
pub enum EdgeConfigError {
    #[error("cannot determine hostname: {0}")]
    Hostname(#[source] std::io::Error),

    #[error("unsupported CGroupDriver: {0}")]
    UnsupportedCGroupDriver(String),

    #[error("invalid label {0}: expected key=value")]
    InvalidLabel(String),

    #[error("{0}")]
    ValidationFailed(String),

    #[error("EdgeCore is already running on this node, please run reset to clean up first")]
    AlreadyRunning,

    #[error("Process inspection failed: {0}")]
    Process(#[from] ProcessError),

    #[error("install failed: {0}")]
    Install(#[from] InstallError),

    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for edge operations
pub type Result<T> = std::result::Result<T, EdgeConfigError>;
