//! Helm command-line backend
//!
//! Values are streamed to `helm` on stdin (`--values -`) so nothing touches
//! disk. Failures are classified here: Helm's "has no deployed releases"
//! upgrade error becomes [`ReleaseError::NoDeployedReleases`].

use crate::backend::{
    ApplyOptions, ManifestRenderer, ReleaseBackend, ReleaseError, ReleaseReport, RenderOptions,
};
use async_trait::async_trait;
use edgeadm_types::DeploymentTarget;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

const NO_DEPLOYED_RELEASES: &str = "has no deployed releases";

/// Runs the `helm` binary
#[derive(Debug, Clone)]
pub struct HelmCli {
    binary: PathBuf,
    kube_config: Option<PathBuf>,
}

impl Default for HelmCli {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("helm"),
            kube_config: None,
        }
    }
}

impl HelmCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            kube_config: None,
        }
    }

    pub fn with_kube_config(mut self, kube_config: impl Into<PathBuf>) -> Self {
        self.kube_config = Some(kube_config.into());
        self
    }

    fn base_args(&self, verb: &str, target: &DeploymentTarget) -> Vec<String> {
        let mut args = vec![
            verb.to_string(),
            target.component_name.clone(),
            target.chart.to_string(),
            "--namespace".to_string(),
            target.namespace.clone(),
            "--values".to_string(),
            "-".to_string(),
        ];
        if let Some(kube_config) = &self.kube_config {
            args.push("--kubeconfig".to_string());
            args.push(kube_config.to_string_lossy().into_owned());
        }
        args
    }

    fn apply_args(&self, verb: &str, target: &DeploymentTarget, options: &ApplyOptions) -> Vec<String> {
        let mut args = self.base_args(verb, target);
        if options.dry_run {
            args.push("--dry-run".to_string());
        }
        if let Some(timeout) = options.wait {
            args.push("--wait".to_string());
            args.push("--timeout".to_string());
            args.push(format!("{}s", timeout.as_secs()));
        }
        if options.create_namespace {
            args.push("--create-namespace".to_string());
        }
        args
    }

    async fn run(&self, args: &[String], target: &DeploymentTarget) -> Result<String, ReleaseError> {
        let values = target.values.to_yaml()?;
        debug!(binary = %self.binary.display(), args = ?args, "Running helm");

        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(values.as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(classify_failure(
            &target.component_name,
            &format!("helm {}", args.first().map(String::as_str).unwrap_or_default()),
            &output.status.to_string(),
            stderr,
        ))
    }

    fn report(target: &DeploymentTarget, output: String) -> ReleaseReport {
        ReleaseReport {
            release: target.component_name.clone(),
            namespace: target.namespace.clone(),
            revision: parse_revision(&output),
            output,
        }
    }
}

/// Map a failed helm invocation to a release error
pub fn classify_failure(release: &str, command: &str, status: &str, stderr: String) -> ReleaseError {
    if stderr.contains(NO_DEPLOYED_RELEASES) {
        return ReleaseError::NoDeployedReleases {
            release: release.to_string(),
        };
    }
    ReleaseError::CommandFailed {
        command: command.to_string(),
        status: status.to_string(),
        stderr,
    }
}

/// `REVISION: n` line of helm's release summary
fn parse_revision(output: &str) -> Option<u32> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("REVISION:"))
        .and_then(|rest| rest.trim().parse().ok())
}

#[async_trait]
impl ReleaseBackend for HelmCli {
    async fn upgrade(
        &self,
        target: &DeploymentTarget,
        options: &ApplyOptions,
    ) -> Result<ReleaseReport, ReleaseError> {
        let args = self.apply_args("upgrade", target, options);
        let output = self.run(&args, target).await?;
        Ok(Self::report(target, output))
    }

    async fn install(
        &self,
        target: &DeploymentTarget,
        options: &ApplyOptions,
    ) -> Result<ReleaseReport, ReleaseError> {
        let args = self.apply_args("install", target, options);
        let output = self.run(&args, target).await?;
        Ok(Self::report(target, output))
    }

    fn name(&self) -> &str {
        "helm"
    }
}

#[async_trait]
impl ManifestRenderer for HelmCli {
    async fn render(
        &self,
        target: &DeploymentTarget,
        options: &RenderOptions,
    ) -> Result<String, ReleaseError> {
        let mut args = self.base_args("template", target);
        if !options.skip_crds {
            args.push("--include-crds".to_string());
        }
        self.run(&args, target).await
    }
}
