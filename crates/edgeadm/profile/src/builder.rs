//! Value tree assembly
//!
//! Profile overrides, user `--set` values and dedicated CLI flags all end up
//! in one pending list; it is reconciled once and folded onto the profile's
//! base tree.

use crate::error::Result;
use crate::merge::{fold_into, reconcile};
use crate::paths;
use crate::resolver::{ProfileResolver, ResolvedProfile};
use edgeadm_types::{OverrideExpression, ValueTree};
use tracing::debug;

/// Value-bearing flags that map onto well-known value paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagOverrides {
    /// Comma-separated addresses placed in the cloud hub certificate
    pub advertise_address: Option<String>,
    pub cloudcore_image: Option<String>,
    pub cloudcore_tag: Option<String>,
    pub iptables_mgr_image: Option<String>,
    pub iptables_mgr_tag: Option<String>,
}

impl FlagOverrides {
    /// `path=value` strings for every flag that was given
    pub fn expressions(&self) -> Vec<String> {
        let mut sets = Vec::new();

        if let Some(addresses) = non_empty(&self.advertise_address) {
            for (index, address) in addresses.split(',').enumerate() {
                sets.push(format!(
                    "{}[{}]={}",
                    paths::CLOUDHUB_ADVERTISE_ADDRESS,
                    index,
                    address
                ));
            }
        }

        let simple = [
            (paths::CLOUDCORE_IMAGE_REPOSITORY, &self.cloudcore_image),
            (paths::CLOUDCORE_IMAGE_TAG, &self.cloudcore_tag),
            (paths::IPTABLES_MGR_IMAGE_REPOSITORY, &self.iptables_mgr_image),
            (paths::IPTABLES_MGR_IMAGE_TAG, &self.iptables_mgr_tag),
        ];
        for (path, value) in simple {
            if let Some(value) = non_empty(value) {
                sets.push(format!("{}={}", path, value));
            }
        }

        sets
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Fully merged configuration for one profile
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValues {
    pub profile: ResolvedProfile,
    /// Reconciled overrides, in the order they were folded
    pub overrides: Vec<OverrideExpression>,
    pub tree: ValueTree,
}

/// Runs profile resolution and override merging
pub struct ValuesBuilder {
    resolver: ProfileResolver,
}

impl ValuesBuilder {
    pub fn new(resolver: ProfileResolver) -> Self {
        Self { resolver }
    }

    /// Build the value tree for `profile` with user `sets` and `flags`
    pub fn build(
        &self,
        profile: &str,
        sets: &[String],
        flags: &FlagOverrides,
    ) -> Result<ResolvedValues> {
        let mut pending = sets.to_vec();
        let resolved = self.resolver.resolve(profile, &mut pending)?;
        pending.extend(flags.expressions());

        let overrides = reconcile(&pending);
        for expression in &overrides {
            debug!(%expression, "Applying override");
        }

        let mut tree = resolved.base.clone();
        fold_into(&mut tree, &overrides)?;

        Ok(ResolvedValues {
            profile: resolved,
            overrides,
            tree,
        })
    }
}
