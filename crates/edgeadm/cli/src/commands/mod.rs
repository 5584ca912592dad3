//! Command implementations

pub mod init;
pub mod join;
pub mod manifest;
pub mod version;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::print_warning;
use clap::Args;
use edgeadm_deployment::{DiscoveredVersion, HttpVersionSource, RetryPolicy, VersionOrigin};
use edgeadm_profile::{profile_store, FlagOverrides, ProfileResolver, ValuesBuilder};
use edgeadm_types::{ChartRef, DeploymentTarget, Region};
use std::path::PathBuf;
use tracing::debug;

/// Latest KubeEdge release for `region`, or the fallback once retries run out
pub(crate) async fn discover_release(region: Region) -> DiscoveredVersion {
    let source = HttpVersionSource::for_region(region);
    let discovered = RetryPolicy::default().resolve(&source).await;
    if discovered.origin == VersionOrigin::Fallback {
        print_warning(&format!(
            "Failed to get the latest KubeEdge release version, using default version {}",
            discovered
        ));
    }
    discovered
}

/// Flags shared by every command that renders cloud charts
#[derive(Args, Debug, Clone, Default)]
pub struct ValueArgs {
    /// Profile as key=value, e.g. version=v1.12.0 or iptablesMgrMode=external
    #[arg(long)]
    pub profile: Option<String>,

    /// Set values on the command line (repeatable, or comma separated: key1=val1,key2=val2)
    #[arg(long = "set")]
    pub sets: Vec<String>,

    /// Namespace to install the cloud components into
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// IPs placed in the cloudcore certificate SubAltNames, comma separated
    #[arg(long)]
    pub advertise_address: Option<String>,

    /// Whole cloudcore image, e.g. kubeedge/cloudcore
    #[arg(long)]
    pub cloudcore_image: Option<String>,

    /// cloudcore image tag
    #[arg(long)]
    pub cloudcore_tag: Option<String>,

    /// Whole iptables manager image
    #[arg(long = "iptablesmgr-image")]
    pub iptables_mgr_image: Option<String>,

    /// iptables manager image tag
    #[arg(long = "iptablesmgr-tag")]
    pub iptables_mgr_tag: Option<String>,

    /// kubeconfig path
    #[arg(long)]
    pub kube_config: Option<PathBuf>,

    /// Directory holding the charts
    #[arg(long)]
    pub charts_dir: Option<PathBuf>,

    /// Directory holding profiles/<key>.yaml (builtin profiles when unset)
    #[arg(long)]
    pub profiles_dir: Option<PathBuf>,
}

impl ValueArgs {
    fn flag_overrides(&self) -> FlagOverrides {
        FlagOverrides {
            advertise_address: self.advertise_address.clone(),
            cloudcore_image: self.cloudcore_image.clone(),
            cloudcore_tag: self.cloudcore_tag.clone(),
            iptables_mgr_image: self.iptables_mgr_image.clone(),
            iptables_mgr_tag: self.iptables_mgr_tag.clone(),
        }
    }

    /// Resolve the profile and overrides into a deployment target
    pub fn build_target(&self, config: &CliConfig) -> CliResult<DeploymentTarget> {
        let profiles_dir = config.profiles_dir(self.profiles_dir.clone());
        let store = profile_store(profiles_dir.as_deref());
        let builder = ValuesBuilder::new(ProfileResolver::new(store));

        let resolved = builder.build(
            self.profile.as_deref().unwrap_or_default(),
            &self.sets,
            &self.flag_overrides(),
        )?;

        let location = resolved.profile.key.chart_location();
        let charts_dir = config.charts_dir(self.charts_dir.clone());
        let target = DeploymentTarget::new(
            location.component,
            ChartRef::in_dir(&charts_dir, &location.subdir),
            config.namespace(self.namespace.clone()),
            resolved.tree,
        );
        debug!(
            component = %target.component_name,
            chart = %target.chart,
            namespace = %target.namespace,
            overrides = resolved.overrides.len(),
            "Deployment target resolved"
        );
        Ok(target)
    }
}
