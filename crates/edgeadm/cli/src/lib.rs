//! edgeadm - KubeEdge installer
//!
//! Terminal interface for bringing up KubeEdge:
//! - Install or upgrade the cloud components from a profile and overrides
//! - Render the cloud manifests without touching the cluster
//! - Join an edge node and write its edgecore configuration
//! - Discover the latest release

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
pub mod output;

use commands::{init, join, manifest, version};
pub use config::CliConfig;
pub use error::{CliError, CliResult};

/// edgeadm CLI application
#[derive(Parser)]
#[command(name = "edgeadm")]
#[command(about = "edgeadm - Install KubeEdge cloud and edge components", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(long, global = true, env = "EDGEADM_CONFIG")]
    config_file: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Install or upgrade the cloud components
    Init(init::InitArgs),

    /// Render the cloud manifests
    Manifest {
        #[command(subcommand)]
        command: manifest::ManifestCommands,
    },

    /// Install edgecore and write its configuration
    Join(join::JoinArgs),

    /// Only write the edgecore configuration
    EdgeConfig(join::ConnectArgs),

    /// Show the latest KubeEdge release
    Version(version::VersionArgs),
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    let filter = if cli.verbose { "debug" } else { "info" };
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    let config = CliConfig::load(cli.config_file.as_deref())?;

    match cli.command {
        Commands::Init(args) => init::execute(args, &config).await,
        Commands::Manifest { command } => manifest::execute(command, &config).await,
        Commands::Join(args) => join::join(args, &config).await,
        Commands::EdgeConfig(args) => join::edge_config(args, &config),
        Commands::Version(args) => version::execute(args, &config).await,
    }
}
