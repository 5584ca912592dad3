//! CLI error types

use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Profile resolution or override merging failed
    #[error(transparent)]
    Profile(#[from] edgeadm_profile::ProfileError),

    /// Cluster apply failed
    #[error(transparent)]
    Deployment(#[from] edgeadm_deployment::DeploymentError),

    /// Edge configuration failed
    #[error(transparent)]
    Edge(#[from] edgeadm_edge::EdgeConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
