//! edgeadm Types - Shared data model
//!
//! Types shared by every edgeadm crate:
//! - `ValueTree`: the merged configuration consumed by chart rendering
//! - `OverrideExpression` / `ProfileExpression`: parsed `path=value` and `key=value` inputs
//! - `ProfileKey`: the known profile keys and where their charts live
//! - `DeploymentTarget`: what gets applied, and where
//! - `InstallOptions` / `ComponentType`: inputs for the artifact installer
//! - `Region` / `DownloadEndpoints`: region-selected download locations

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod constants;
pub mod install;
pub mod profile;
pub mod region;
pub mod target;
pub mod values;

pub use install::{host_arch, ComponentType, InstallOptions};
pub use profile::{ChartLocation, ProfileExpression, ProfileKey};
pub use region::{DownloadEndpoints, Region, RegionParseError};
pub use target::{ChartRef, DeploymentTarget};
pub use values::{OverrideExpression, ValueTree, ValueTreeError};
