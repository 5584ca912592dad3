//! Preflight checks run before anything is applied

use crate::backend::ClusterProbe;
use crate::error::{DeploymentError, Result};
use crate::process::ProcessLifecycle;
use semver::Version;
use tracing::{info, warn};

/// Oldest Kubernetes control plane cloudcore supports
pub const K8S_MIN_SUPPORTED: Version = Version::new(1, 11, 0);

/// Refuse to continue while `binary` is running, unless forced
///
/// A forced run does not look at the process table at all.
pub async fn ensure_not_running(
    processes: &dyn ProcessLifecycle,
    binary: &str,
    forced: bool,
) -> Result<()> {
    if forced {
        warn!(binary, "Forced, skipping running process check");
        return Ok(());
    }
    if processes.is_running(binary).await? {
        return Err(DeploymentError::AlreadyRunning {
            component: binary.to_string(),
        });
    }
    Ok(())
}

/// Check the control plane is reachable and at least `minimum`
///
/// Returns the discovered server version.
pub async fn ensure_cluster_compatible(
    probe: &dyn ClusterProbe,
    minimum: &Version,
) -> Result<Version> {
    let found = probe.server_version().await?;
    // pre-release tags (v1.24.0-gke.1) must not push a release below the floor
    let comparable = Version::new(found.major, found.minor, found.patch);
    if comparable < *minimum {
        return Err(DeploymentError::UnsupportedClusterVersion {
            found: found.to_string(),
            minimum: minimum.to_string(),
        });
    }
    info!(version = %found, "Kubernetes control plane is compatible");
    Ok(found)
}
