//! External capture tool invocation.
//!
//! The invoker is a trait so orchestration can be exercised without any
//! camera tools installed; the production implementation spawns the tool
//! as a child process with a bounded timeout.

use super::attempt::CaptureAttempt;
use async_trait::async_trait;
use std::io;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Failure of one tool invocation.
///
/// `ToolNotFound` and `ExecutionFailed` are recoverable on chains that have
/// a fallback tool; `TimedOut` follows the same policy. None of these ever
/// reach a caller directly; the orchestrator folds them into its result.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("capture tool {tool:?} not found")]
    ToolNotFound { tool: String },
    #[error("capture tool {tool:?} failed: {detail}")]
    ExecutionFailed { tool: String, detail: String },
    #[error("capture tool {tool:?} timed out after {timeout:?}")]
    TimedOut { tool: String, timeout: Duration },
}

impl BackendError {
    /// Name of the tool the invocation targeted.
    pub fn tool(&self) -> &str {
        match self {
            BackendError::ToolNotFound { tool }
            | BackendError::ExecutionFailed { tool, .. }
            | BackendError::TimedOut { tool, .. } => tool,
        }
    }
}

/// Runs a single capture attempt.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Invokes the tool described by `attempt`.
    ///
    /// Returns `Ok` only for a zero exit status. The tool's side effect is
    /// writing the image file named in its arguments; reading that file is
    /// the caller's business.
    async fn invoke(&self, attempt: &CaptureAttempt) -> Result<(), BackendError>;
}

/// Invoker that spawns the real tool as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker;

#[async_trait]
impl ToolInvoker for ProcessInvoker {
    async fn invoke(&self, attempt: &CaptureAttempt) -> Result<(), BackendError> {
        let mut command = Command::new(attempt.tool());
        command.args(attempt.args()).kill_on_drop(true);

        tracing::debug!(tool = attempt.tool(), "Spawning capture tool");

        let output = match tokio::time::timeout(attempt.timeout(), command.output()).await {
            Ok(spawned) => spawned.map_err(|error| spawn_error(attempt.tool(), error))?,
            // dropping the output future kills the child via kill_on_drop
            Err(_) => {
                return Err(BackendError::TimedOut {
                    tool: attempt.tool().to_string(),
                    timeout: attempt.timeout(),
                })
            }
        };

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = match stderr.trim() {
                "" => output.status.to_string(),
                trimmed => trimmed.to_string(),
            };
            Err(BackendError::ExecutionFailed {
                tool: attempt.tool().to_string(),
                detail,
            })
        }
    }
}

fn spawn_error(tool: &str, error: io::Error) -> BackendError {
    if error.kind() == io::ErrorKind::NotFound {
        BackendError::ToolNotFound {
            tool: tool.to_string(),
        }
    } else {
        BackendError::ExecutionFailed {
            tool: tool.to_string(),
            detail: error.to_string(),
        }
    }
}
