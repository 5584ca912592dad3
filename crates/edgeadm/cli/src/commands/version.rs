//! `edgeadm version`: discover the latest KubeEdge release

use super::discover_release;
use crate::config::CliConfig;
use crate::error::CliResult;
use clap::Args;
use edgeadm_types::Region;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Region whose version endpoint is queried (zh or en)
    #[arg(long)]
    pub region: Option<Region>,
}

pub async fn execute(args: VersionArgs, config: &CliConfig) -> CliResult<()> {
    let discovered = discover_release(config.region(args.region)).await;
    println!("edgeadm {}", env!("CARGO_PKG_VERSION"));
    println!("KubeEdge {}", discovered);
    Ok(())
}
