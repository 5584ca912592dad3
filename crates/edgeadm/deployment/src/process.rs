//! Local process inspection
//!
//! Used to refuse a second cloudcore/edgecore on the same host and to stop
//! edgecore on tear-down.

use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Process inspection errors
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{command} exited with {status}")]
    CommandFailed { command: String, status: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Query and stop processes by exact binary name
#[async_trait]
pub trait ProcessLifecycle: Send + Sync {
    async fn is_running(&self, binary: &str) -> Result<bool, ProcessError>;

    /// Stop every process named `binary`. Stopping nothing is not an error.
    async fn kill(&self, binary: &str) -> Result<(), ProcessError>;
}

/// `pgrep`/`pkill` backed lifecycle
#[derive(Debug, Clone, Default)]
pub struct SystemProcessLifecycle;

impl SystemProcessLifecycle {
    async fn exit_code(command: &str, binary: &str) -> Result<Option<i32>, ProcessError> {
        let status = Command::new(command)
            .args(["-x", binary])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        debug!(command, binary, status = %status, "Process query finished");
        Ok(status.code())
    }
}

#[async_trait]
impl ProcessLifecycle for SystemProcessLifecycle {
    async fn is_running(&self, binary: &str) -> Result<bool, ProcessError> {
        // pgrep: 0 = matched, 1 = nothing matched
        match Self::exit_code("pgrep", binary).await? {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            other => Err(ProcessError::CommandFailed {
                command: format!("pgrep -x {}", binary),
                status: format!("{:?}", other),
            }),
        }
    }

    async fn kill(&self, binary: &str) -> Result<(), ProcessError> {
        match Self::exit_code("pkill", binary).await? {
            Some(0) | Some(1) => Ok(()),
            other => Err(ProcessError::CommandFailed {
                command: format!("pkill -x {}", binary),
                status: format!("{:?}", other),
            }),
        }
    }
}
