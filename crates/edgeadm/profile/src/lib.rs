//! edgeadm Profile - Configuration resolution
//!
//! Turns a `key=value` profile plus an ordered list of `path=value`
//! overrides into one deterministic [`ValueTree`]:
//!
//! 1. [`ProfileResolver`] validates the profile key against a [`ProfileStore`],
//!    normalizes key-specific values and synthesizes overrides for them.
//! 2. [`merge::reconcile`] sorts and deduplicates every override (last in sort
//!    order wins for a path).
//! 3. [`merge::fold_into`] applies the survivors onto the profile's base tree
//!    with a Helm `--set` compatible path setter.
//!
//! [`ValuesBuilder`] runs the whole pipeline.
//!
//! ## Usage
//!
//! ```no_run
//! use edgeadm_profile::{BuiltinProfileStore, FlagOverrides, ProfileResolver, ValuesBuilder};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), edgeadm_profile::ProfileError> {
//! let resolver = ProfileResolver::new(Arc::new(BuiltinProfileStore));
//! let builder = ValuesBuilder::new(resolver);
//!
//! let resolved = builder.build(
//!     "version=v1.12.0",
//!     &["cloudCore.replicaCount=2".to_string()],
//!     &FlagOverrides::default(),
//! )?;
//! println!("{}", resolved.tree.to_yaml()?);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod builder;
pub mod error;
pub mod merge;
pub mod paths;
pub mod resolver;
pub mod setter;
pub mod store;

pub use builder::{FlagOverrides, ResolvedValues, ValuesBuilder};
pub use error::{ProfileError, Result};
pub use resolver::{IptablesMgrMode, ProfileResolver, ResolvedProfile, HELM_SUPPORTED_MIN};
pub use store::{profile_store, BuiltinProfileStore, DirProfileStore, ProfileStore};

pub use edgeadm_types::{OverrideExpression, ProfileKey, ValueTree};
