//! `edgeadm join` and `edgeadm edge-config`: edge node setup

use super::discover_release;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{print_info, print_success};
use clap::Args;
use edgeadm_deployment::SystemProcessLifecycle;
use edgeadm_edge::{
    EdgeConfigMaterializer, EdgeConnectParams, EdgeJoiner, HostIdentity, LocalTarballInstaller,
};
use edgeadm_types::Region;
use std::path::PathBuf;
use std::sync::Arc;

/// How the edge node reaches cloudcore and identifies itself
#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// cloudcore websocket address, e.g. 10.10.102.78:10000
    #[arg(short = 'e', long = "cloudcore-ipport")]
    pub cloudcore_address: String,

    /// Token used to fetch the edge node certificate
    #[arg(short, long)]
    pub token: Option<String>,

    /// cloudcore certificate port
    #[arg(short = 's', long = "certport")]
    pub cert_port: Option<u16>,

    /// cloudcore QUIC port
    #[arg(long = "quicport")]
    pub quic_port: Option<u16>,

    /// cloudcore stream tunnel port
    #[arg(long = "tunnelport")]
    pub tunnel_port: Option<u16>,

    /// Node name, defaults to the hostname
    #[arg(short = 'i', long = "edgenode-name")]
    pub node_name: Option<String>,

    /// Node IP, defaults to the address of the default route
    #[arg(long = "edgenode-ip")]
    pub node_ip: Option<String>,

    /// Container runtime type (docker or remote)
    #[arg(short = 'r', long = "runtimetype")]
    pub runtime_type: Option<String>,

    /// CRI endpoint for the remote runtime, also used for images
    #[arg(short = 'p', long)]
    pub remote_runtime_endpoint: Option<String>,

    /// Cgroup driver (cgroupfs or systemd)
    #[arg(long = "cgroupdriver")]
    pub cgroup_driver: Option<String>,

    /// Node labels, key=value, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub labels: Vec<String>,

    /// Taint the node with node-role.kubernetes.io/edge:NoSchedule
    #[arg(long)]
    pub with_edge_taint: bool,

    /// Where to write the edgecore configuration
    #[arg(short, long = "config")]
    pub config_path: Option<PathBuf>,
}

impl ConnectArgs {
    fn params(&self) -> EdgeConnectParams {
        EdgeConnectParams {
            cloudcore_address: self.cloudcore_address.clone(),
            token: self.token.clone(),
            cert_port: self.cert_port,
            quic_port: self.quic_port,
            tunnel_port: self.tunnel_port,
            node_name: self.node_name.clone(),
            node_ip: self.node_ip.clone(),
            runtime_type: self.runtime_type.clone(),
            remote_runtime_endpoint: self.remote_runtime_endpoint.clone(),
            cgroup_driver: self.cgroup_driver.clone(),
            labels: self.labels.clone(),
            with_default_taint: self.with_edge_taint,
        }
    }

    fn materializer(&self, config: &CliConfig) -> EdgeConfigMaterializer {
        EdgeConfigMaterializer::new(config.edge_config_path(self.config_path.clone()))
    }
}

#[derive(Args, Debug)]
pub struct JoinArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Directory holding pre-downloaded release tarballs
    #[arg(long = "tarballpath")]
    pub tarball_path: Option<PathBuf>,

    /// Download region (zh or en)
    #[arg(long)]
    pub region: Option<Region>,
}

pub async fn join(args: JoinArgs, config: &CliConfig) -> CliResult<()> {
    let region = config.region(args.region);
    let release = discover_release(region).await;

    let materializer = args.connect.materializer(config);
    let path = materializer.path().to_path_buf();
    let joiner = EdgeJoiner::new(
        Arc::new(SystemProcessLifecycle),
        Arc::new(LocalTarballInstaller),
        materializer,
    );
    joiner
        .join(
            &args.connect.params(),
            &HostIdentity::detect()?,
            release.version,
            region,
            args.tarball_path,
        )
        .await?;

    print_success(&format!("EdgeCore configuration written to {}", path.display()));
    print_info("Start edgecore to register this node with the cloud");
    Ok(())
}

pub fn edge_config(args: ConnectArgs, config: &CliConfig) -> CliResult<()> {
    let materializer = args.materializer(config);
    materializer.materialize(&args.params(), &HostIdentity::detect()?)?;
    print_success(&format!(
        "EdgeCore configuration written to {}",
        materializer.path().display()
    ));
    Ok(())
}
