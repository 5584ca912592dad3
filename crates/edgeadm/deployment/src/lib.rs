//! edgeadm Deployment - Cluster apply orchestration
//!
//! Applies a merged value tree to the cluster with an upgrade-first,
//! install-on-absence protocol, so repeated invocations converge on the same
//! release without the caller knowing whether one already exists.
//!
//! ## Architectural Boundaries
//!
//! - `edgeadm-profile` owns: profile resolution and value tree assembly
//! - `edgeadm-deployment` owns: the apply protocol, preflight checks, version discovery
//! - Helm, kubectl and the process table are reached only through the traits
//!   in [`backend`] and [`process`]
//!
//! ## Usage
//!
//! ```no_run
//! use edgeadm_deployment::{HelmCli, Orchestrator};
//! use edgeadm_types::{ChartRef, DeploymentTarget, ValueTree};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::new(Arc::new(HelmCli::default()));
//! let target = DeploymentTarget::new(
//!     "cloudcore",
//!     ChartRef::new("/etc/kubeedge/charts/cloudcore"),
//!     "kubeedge",
//!     ValueTree::new(),
//! );
//! let outcome = orchestrator.apply(&target, false, false).await?;
//! println!("{}", outcome);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod backend;
pub mod error;
pub mod helm;
pub mod kubectl;
pub mod manifest;
pub mod orchestrator;
pub mod preflight;
pub mod process;
pub mod version;

pub use backend::{
    ApplyOptions, ClusterProbe, ManifestRenderer, ProbeError, ReleaseBackend, ReleaseError,
    ReleaseReport, RenderOptions,
};
pub use error::{ApplyStage, DeploymentError, Result};
pub use helm::HelmCli;
pub use kubectl::KubectlProbe;
pub use manifest::generate_manifests;
pub use orchestrator::{ApplyOutcome, Orchestrator};
pub use preflight::{ensure_cluster_compatible, ensure_not_running, K8S_MIN_SUPPORTED};
pub use process::{ProcessError, ProcessLifecycle, SystemProcessLifecycle};
pub use version::{
    DiscoveredVersion, FetchError, HttpVersionSource, RetryPolicy, VersionOrigin, VersionSource,
    DEFAULT_VERSION,
};
