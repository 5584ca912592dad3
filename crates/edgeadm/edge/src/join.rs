//! Edge node join flow
//!
//! Refuse to run next to a live edgecore, install the release artifacts,
//! then materialize the configuration.

use crate::config::{EdgeCoreConfig, HostIdentity};
use crate::error::{EdgeConfigError, InstallError, Result};
use crate::materialize::{EdgeConfigMaterializer, EdgeConnectParams};
use async_trait::async_trait;
use edgeadm_deployment::ProcessLifecycle;
use edgeadm_types::{ComponentType, InstallOptions, Region};
use semver::Version;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// Places release artifacts for a component on this host
#[async_trait]
pub trait ArtifactInstaller: Send + Sync {
    async fn install(&self, options: &InstallOptions) -> std::result::Result<(), InstallError>;
}

/// Installs from a pre-downloaded tarball directory only
///
/// The directory must hold the release tarball for the requested version
/// and host architecture.
#[derive(Debug, Clone, Default)]
pub struct LocalTarballInstaller;

#[async_trait]
impl ArtifactInstaller for LocalTarballInstaller {
    async fn install(&self, options: &InstallOptions) -> std::result::Result<(), InstallError> {
        let dir = options
            .tarball_path
            .as_ref()
            .ok_or_else(|| InstallError::DownloadUnavailable {
                url: options.download_url(),
            })?;
        let tarball = dir.join(options.tarball_name());
        if !tarball.is_file() {
            return Err(InstallError::MissingArtifacts(tarball));
        }
        info!(
            component = %options.component_type,
            version = %options.version,
            path = %tarball.display(),
            "Using local release tarball"
        );
        Ok(())
    }
}

pub struct EdgeJoiner {
    processes: Arc<dyn ProcessLifecycle>,
    installer: Arc<dyn ArtifactInstaller>,
    materializer: EdgeConfigMaterializer,
}

impl EdgeJoiner {
    pub fn new(
        processes: Arc<dyn ProcessLifecycle>,
        installer: Arc<dyn ArtifactInstaller>,
        materializer: EdgeConfigMaterializer,
    ) -> Self {
        Self {
            processes,
            installer,
            materializer,
        }
    }

    #[instrument(skip_all, fields(cloudcore = %params.cloudcore_address, %version))]
    pub async fn join(
        &self,
        params: &EdgeConnectParams,
        host: &HostIdentity,
        version: Version,
        region: Region,
        tarball_path: Option<PathBuf>,
    ) -> Result<EdgeCoreConfig> {
        let component = ComponentType::EdgeCore;
        if self.processes.is_running(component.binary_name()).await? {
            return Err(EdgeConfigError::AlreadyRunning);
        }

        let options =
            InstallOptions::new(component, version, region).with_tarball_path(tarball_path);
        self.installer.install(&options).await?;

        self.materializer.materialize(params, host)
    }

    /// Stop the local edgecore
    pub async fn tear_down(&self) -> Result<()> {
        self.processes
            .kill(ComponentType::EdgeCore.binary_name())
            .await?;
        info!("EdgeCore stopped");
        Ok(())
    }
}
