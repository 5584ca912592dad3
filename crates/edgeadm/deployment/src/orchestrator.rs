//! Upgrade-first apply protocol
//!
//! 1. Upgrade the release. Unless forced, wait for readiness up to the
//!    configured timeout.
//! 2. If the backend reports that no deployed release exists, install once
//!    with the same values and wait policy, creating the namespace.
//! 3. Every other failure is final. There are no retries.

use crate::backend::{ApplyOptions, ReleaseBackend, ReleaseError, ReleaseReport};
use crate::error::{ApplyStage, DeploymentError, Result};
use edgeadm_types::constants::DEFAULT_HELM_TIMEOUT;
use edgeadm_types::DeploymentTarget;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// How a release reached its applied state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Upgraded(ReleaseReport),
    Installed(ReleaseReport),
}

impl ApplyOutcome {
    pub fn report(&self) -> &ReleaseReport {
        match self {
            ApplyOutcome::Upgraded(report) | ApplyOutcome::Installed(report) => report,
        }
    }
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (verb, report) = match self {
            ApplyOutcome::Upgraded(report) => ("upgraded", report),
            ApplyOutcome::Installed(report) => ("installed", report),
        };
        write!(f, "{} {} in namespace {}", verb, report.release, report.namespace)?;
        if let Some(revision) = report.revision {
            write!(f, " (revision {})", revision)?;
        }
        Ok(())
    }
}

/// Applies deployment targets through a release backend
pub struct Orchestrator {
    backend: Arc<dyn ReleaseBackend>,
    wait_timeout: Duration,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn ReleaseBackend>) -> Self {
        Self {
            backend,
            wait_timeout: DEFAULT_HELM_TIMEOUT,
        }
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    /// Apply `target`, upgrading in place or installing on first use
    #[instrument(
        skip(self, target),
        fields(component = %target.component_name, namespace = %target.namespace, backend = self.backend.name())
    )]
    pub async fn apply(
        &self,
        target: &DeploymentTarget,
        dry_run: bool,
        forced: bool,
    ) -> Result<ApplyOutcome> {
        let upgrade = ApplyOptions {
            dry_run,
            wait: if forced { None } else { Some(self.wait_timeout) },
            create_namespace: false,
        };

        match self.backend.upgrade(target, &upgrade).await {
            Ok(report) => {
                info!(revision = ?report.revision, "Release upgraded");
                Ok(ApplyOutcome::Upgraded(report))
            }
            Err(ReleaseError::NoDeployedReleases { .. }) => {
                info!("No deployed release found, installing");
                let install = ApplyOptions {
                    create_namespace: true,
                    ..upgrade
                };
                let report = self
                    .backend
                    .install(target, &install)
                    .await
                    .map_err(|source| DeploymentError::ApplyFailed {
                        component: target.component_name.clone(),
                        stage: ApplyStage::Install,
                        source,
                    })?;
                info!(revision = ?report.revision, "Release installed");
                Ok(ApplyOutcome::Installed(report))
            }
            Err(source) => Err(DeploymentError::ApplyFailed {
                component: target.component_name.clone(),
                stage: ApplyStage::Upgrade,
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use edgeadm_types::{ChartRef, ValueTree};
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy)]
    enum UpgradeBehaviour {
        Succeed,
        NotFound,
        Fail,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Call {
        op: &'static str,
        options: ApplyOptions,
        values: ValueTree,
    }

    struct FakeBackend {
        upgrade: UpgradeBehaviour,
        install_fails: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeBackend {
        fn new(upgrade: UpgradeBehaviour, install_fails: bool) -> Arc<Self> {
            Arc::new(Self {
                upgrade,
                install_fails,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, op: &'static str, target: &DeploymentTarget, options: &ApplyOptions) {
            self.calls.lock().unwrap().push(Call {
                op,
                options: *options,
                values: target.values.clone(),
            });
        }

        fn report(target: &DeploymentTarget) -> ReleaseReport {
            ReleaseReport {
                release: target.component_name.clone(),
                namespace: target.namespace.clone(),
                revision: Some(1),
                output: String::new(),
            }
        }
    }

    #[async_trait]
    impl ReleaseBackend for FakeBackend {
        async fn upgrade(
            &self,
            target: &DeploymentTarget,
            options: &ApplyOptions,
        ) -> std::result::Result<ReleaseReport, ReleaseError> {
            self.record("upgrade", target, options);
            match self.upgrade {
                UpgradeBehaviour::Succeed => Ok(Self::report(target)),
                UpgradeBehaviour::NotFound => Err(ReleaseError::NoDeployedReleases {
                    release: target.component_name.clone(),
                }),
                UpgradeBehaviour::Fail => Err(ReleaseError::CommandFailed {
                    command: "helm upgrade".into(),
                    status: "exit status: 1".into(),
                    stderr: "timed out waiting for the condition".into(),
                }),
            }
        }

        async fn install(
            &self,
            target: &DeploymentTarget,
            options: &ApplyOptions,
        ) -> std::result::Result<ReleaseReport, ReleaseError> {
            self.record("install", target, options);
            if self.install_fails {
                return Err(ReleaseError::CommandFailed {
                    command: "helm install".into(),
                    status: "exit status: 1".into(),
                    stderr: "namespace forbidden".into(),
                });
            }
            Ok(Self::report(target))
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn target() -> DeploymentTarget {
        DeploymentTarget::new(
            "cloudcore",
            ChartRef::new("charts/cloudcore"),
            "kubeedge",
            ValueTree::from_yaml("cloudCore:\n  image:\n    tag: v1.12.0\n").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_existing_release_is_upgraded() {
        let backend = FakeBackend::new(UpgradeBehaviour::Succeed, false);
        let outcome = Orchestrator::new(backend.clone())
            .apply(&target(), false, false)
            .await
            .unwrap();

        assert!(matches!(outcome, ApplyOutcome::Upgraded(_)));
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].options.wait, Some(DEFAULT_HELM_TIMEOUT));
        assert!(!calls[0].options.create_namespace);
    }

    #[tokio::test]
    async fn test_missing_release_installs_once_with_same_values() {
        let backend = FakeBackend::new(UpgradeBehaviour::NotFound, false);
        let outcome = Orchestrator::new(backend.clone())
            .apply(&target(), false, false)
            .await
            .unwrap();

        assert!(matches!(outcome, ApplyOutcome::Installed(_)));
        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].op, "install");
        assert_eq!(calls[1].values, calls[0].values);
        assert_eq!(calls[1].options.wait, calls[0].options.wait);
        assert!(calls[1].options.create_namespace);
    }

    #[tokio::test]
    async fn test_other_upgrade_failure_does_not_install() {
        let backend = FakeBackend::new(UpgradeBehaviour::Fail, false);
        let err = Orchestrator::new(backend.clone())
            .apply(&target(), false, false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeploymentError::ApplyFailed {
                stage: ApplyStage::Upgrade,
                ..
            }
        ));
        assert!(backend.calls().iter().all(|call| call.op == "upgrade"));
    }

    #[tokio::test]
    async fn test_install_failure_is_final() {
        let backend = FakeBackend::new(UpgradeBehaviour::NotFound, true);
        let err = Orchestrator::new(backend.clone())
            .apply(&target(), false, false)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeploymentError::ApplyFailed {
                stage: ApplyStage::Install,
                ..
            }
        ));
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_forced_apply_skips_wait_and_dry_run_passes_through() {
        let backend = FakeBackend::new(UpgradeBehaviour::NotFound, false);
        Orchestrator::new(backend.clone())
            .with_wait_timeout(Duration::from_secs(5))
            .apply(&target(), true, true)
            .await
            .unwrap();

        for call in backend.calls() {
            assert_eq!(call.options.wait, None);
            assert!(call.options.dry_run);
        }
    }

    #[tokio::test]
    async fn test_custom_wait_timeout() {
        let backend = FakeBackend::new(UpgradeBehaviour::Succeed, false);
        Orchestrator::new(backend.clone())
            .with_wait_timeout(Duration::from_secs(5))
            .apply(&target(), false, false)
            .await
            .unwrap();
        assert_eq!(backend.calls()[0].options.wait, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_outcome_display() {
        let outcome = ApplyOutcome::Installed(FakeBackend::report(&target()));
        assert_eq!(
            outcome.to_string(),
            "installed cloudcore in namespace kubeedge (revision 1)"
        );
    }
}
