//! `edgeadm manifest`: render cloud manifests without applying them

use super::ValueArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use clap::{Args, Subcommand};
use edgeadm_deployment::{generate_manifests, HelmCli, RenderOptions};
use std::path::PathBuf;

/// Manifest subcommands
#[derive(Subcommand, Debug)]
pub enum ManifestCommands {
    /// Render the charts and print the resulting resources
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub values: ValueArgs,

    /// Extra manifest files printed before the rendered charts, comma separated
    #[arg(short, long = "files", alias = "manifests", value_delimiter = ',')]
    pub files: Vec<PathBuf>,

    /// Leave CustomResourceDefinitions out of the output
    #[arg(long)]
    pub skip_crds: bool,
}

pub async fn execute(command: ManifestCommands, config: &CliConfig) -> CliResult<()> {
    match command {
        ManifestCommands::Generate(args) => {
            let target = args.values.build_target(config)?;
            let mut helm = HelmCli::new(config.helm_binary());
            if let Some(kube_config) = args.values.kube_config.clone().or(config.kube_config.clone()) {
                helm = helm.with_kube_config(kube_config);
            }

            let bundle = generate_manifests(
                &helm,
                &target,
                &args.files,
                &RenderOptions {
                    skip_crds: args.skip_crds,
                },
            )
            .await?;
            print!("{}", bundle);
            Ok(())
        }
    }
}
