//! `edgeadm init`: install or upgrade the cloud components

use super::{discover_release, ValueArgs};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{print_info, print_success};
use clap::Args;
use edgeadm_deployment::{
    ensure_cluster_compatible, ensure_not_running, HelmCli, KubectlProbe, Orchestrator,
    SystemProcessLifecycle, K8S_MIN_SUPPORTED,
};
use edgeadm_types::constants::CLOUDCORE_BINARY;
use edgeadm_types::Region;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub values: ValueArgs,

    /// Print the generated resources instead of applying them
    #[arg(short, long)]
    pub dry_run: bool,

    /// Install even if cloudcore is already running, without waiting for readiness
    #[arg(long)]
    pub force: bool,

    /// Region whose version endpoint is queried (zh or en)
    #[arg(long)]
    pub region: Option<Region>,
}

pub async fn execute(args: InitArgs, config: &CliConfig) -> CliResult<()> {
    let release = discover_release(config.region(args.region)).await;

    ensure_not_running(&SystemProcessLifecycle, CLOUDCORE_BINARY, args.force).await?;

    let kube_config = config.kube_config(args.values.kube_config.clone());
    let probe = KubectlProbe::new(config.kubectl_binary()).with_kube_config(&kube_config);
    let version = ensure_cluster_compatible(&probe, &K8S_MIN_SUPPORTED).await?;
    print_info(&format!(
        "Kubernetes version {} verification passed, KubeEdge {} installation will start...",
        version, release
    ));

    let target = args.values.build_target(config)?;
    let helm = HelmCli::new(config.helm_binary()).with_kube_config(&kube_config);
    let outcome = Orchestrator::new(Arc::new(helm))
        .with_wait_timeout(config.wait_timeout())
        .apply(&target, args.dry_run, args.force)
        .await?;

    if args.dry_run {
        print!("{}", outcome.report().output);
    }
    print_success(&outcome.to_string());
    Ok(())
}
