//! edgeadm Edge - EdgeCore configuration
//!
//! Produces the static configuration file edgecore reads at startup from a
//! handful of connection parameters:
//!
//! - [`EdgeConnectParams`]: cloud hub address, ports, node identity, runtime
//! - [`EdgeConfigMaterializer`]: defaulting, validation, persistence
//! - [`EdgeJoiner`]: process guard, artifact install, then materialization
//!
//! ## Usage
//!
//! ```no_run
//! use edgeadm_edge::{EdgeConfigMaterializer, EdgeConnectParams, HostIdentity};
//!
//! # fn example() -> Result<(), edgeadm_edge::EdgeConfigError> {
//! let params = EdgeConnectParams {
//!     cloudcore_address: "10.0.0.1:10000".to_string(),
//!     token: Some("token".to_string()),
//!     ..Default::default()
//! };
//! EdgeConfigMaterializer::default().materialize(&params, &HostIdentity::detect()?)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod error;
pub mod join;
pub mod materialize;
pub mod validation;

pub use config::{CGroupDriver, EdgeCoreConfig, HostIdentity, Taint};
pub use error::{EdgeConfigError, InstallError, Result};
pub use join::{ArtifactInstaller, EdgeJoiner, LocalTarballInstaller};
pub use materialize::{build_config, parse_labels, EdgeConfigMaterializer, EdgeConnectParams};
