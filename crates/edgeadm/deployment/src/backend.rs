//! Collaborator boundaries
//!
//! The orchestrator never talks to Helm or the API server directly. Backends
//! implement these traits and are responsible for classifying their own
//! failures; in particular a missing release must surface as
//! [`ReleaseError::NoDeployedReleases`], never as free text.

use async_trait::async_trait;
use edgeadm_types::DeploymentTarget;
use semver::Version;
use std::time::Duration;
use thiserror::Error;

/// Options for a single upgrade or install
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Validate and template only, mutate nothing
    pub dry_run: bool,
    /// Block until resources are ready, up to the given timeout
    pub wait: Option<Duration>,
    /// Create the target namespace if it does not exist
    pub create_namespace: bool,
}

/// Options for rendering manifests without applying them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Leave CustomResourceDefinitions out of the output
    pub skip_crds: bool,
}

/// What the backend reported for a successful upgrade or install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    pub release: String,
    pub namespace: String,
    pub revision: Option<u32>,
    /// Raw backend output (rendered manifests for dry runs)
    pub output: String,
}

/// Release operation errors
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// No prior deployed release exists for this name
    #[error("release {release} has no deployed releases")]
    NoDeployedReleases { release: String },

    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("cannot encode values: {0}")]
    Values(#[from] edgeadm_types::ValueTreeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Release management backend
#[async_trait]
pub trait ReleaseBackend: Send + Sync {
    /// Upgrade an existing release
    async fn upgrade(
        &self,
        target: &DeploymentTarget,
        options: &ApplyOptions,
    ) -> Result<ReleaseReport, ReleaseError>;

    /// Install a new release
    async fn install(
        &self,
        target: &DeploymentTarget,
        options: &ApplyOptions,
    ) -> Result<ReleaseReport, ReleaseError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Turns a target into manifest text without applying it
#[async_trait]
pub trait ManifestRenderer: Send + Sync {
    async fn render(
        &self,
        target: &DeploymentTarget,
        options: &RenderOptions,
    ) -> Result<String, ReleaseError>;
}

/// Cluster probe errors
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}")]
    Unreachable(String),

    #[error("cannot parse server version: {0}")]
    InvalidVersion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reports the Kubernetes control plane version
#[async_trait]
pub trait ClusterProbe: Send + Sync {
    async fn server_version(&self) -> Result<Version, ProbeError>;
}
