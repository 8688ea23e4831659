//! Sandboxed execution of model-generated code
//!
//! Each fragment runs as a script in a freshly spawned interpreter process
//! with a hard timeout. No interpreter state survives between invocations;
//! cross-cycle variable reuse is traded away for isolation.

use std::io::Write;
use std::process::Stdio;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Terminal status of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStatus {
    Success,
    /// Non-zero exit; carries the exit code when the OS reports one.
    Failure(Option<i32>),
    /// Killed at the timeout deadline.
    TimedOut,
}

/// Captured outcome of running one code fragment.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub status: ExecStatus,
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        matches!(self.status, ExecStatus::Success)
    }
}

/// Capability interface for running untrusted code fragments.
///
/// Code-level failures (non-zero exit, timeout) come back as an
/// `ExecutionResult`, never as an `Err`; `Err` is reserved for
/// infrastructure problems such as spawn failures or temp-file IO.
/// Implementations must guarantee that no execution outlives its timeout.
#[async_trait]
pub trait Sandbox: Send + Sync {
    async fn execute(&self, code: &str, timeout: Duration) -> Result<ExecutionResult>;
}

/// Runs each fragment in a fresh interpreter subprocess.
pub struct SubprocessSandbox {
    interpreter: String,
}

impl SubprocessSandbox {
    pub fn new() -> Self {
        Self {
            interpreter: "python3".to_string(),
        }
    }

    pub fn with_interpreter(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

impl Default for SubprocessSandbox {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sandbox for SubprocessSandbox {
    async fn execute(&self, code: &str, limit: Duration) -> Result<ExecutionResult> {
        // The script file is removed when `script` drops, on every exit path.
        let mut script = tempfile::Builder::new()
            .prefix("codeloop-")
            .suffix(".py")
            .tempfile()
            .context("Failed to create script file")?;
        script
            .write_all(code.as_bytes())
            .context("Failed to write script file")?;
        script.flush().context("Failed to flush script file")?;

        debug!(
            interpreter = %self.interpreter,
            code_len = code.len(),
            timeout_secs = limit.as_secs(),
            "Executing code fragment"
        );

        let start = Instant::now();

        let mut child = Command::new(&self.interpreter)
            .arg(script.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn interpreter: {}", self.interpreter))?;

        // Drain both pipes concurrently so a timeout still yields the output
        // produced before the kill.
        let stdout_pipe = child.stdout.take().context("Child stdout was not piped")?;
        let stderr_pipe = child.stderr.take().context("Child stderr was not piped")?;
        let stdout_task = tokio::spawn(drain(stdout_pipe));
        let stderr_task = tokio::spawn(drain(stderr_pipe));

        let status = match timeout(limit, child.wait()).await {
            Ok(waited) => {
                let exit = waited.context("Failed to wait for interpreter")?;
                if exit.success() {
                    ExecStatus::Success
                } else {
                    ExecStatus::Failure(exit.code())
                }
            }
            Err(_) => {
                warn!(
                    timeout_secs = limit.as_secs(),
                    "Execution timed out, killing interpreter"
                );
                let _ = child.start_kill();
                let _ = child.wait().await;
                ExecStatus::TimedOut
            }
        };

        let duration = start.elapsed();
        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        debug!(?status, duration_ms = duration.as_millis() as u64, "Execution finished");

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            status,
            duration,
        })
    }
}

async fn drain(mut pipe: impl AsyncRead + Unpin) -> Vec<u8> {
    let mut buf = Vec::new();
    let _ = pipe.read_to_end(&mut buf).await;
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stdout_captured() {
        let sandbox = SubprocessSandbox::new();
        let result = sandbox
            .execute("print(2+2)", Duration::from_secs(10))
            .await
            .unwrap();

        assert_eq!(result.status, ExecStatus::Success);
        assert!(result.success());
        assert!(result.stdout.contains('4'));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure_not_error() {
        let sandbox = SubprocessSandbox::new();
        let result = sandbox
            .execute("import sys; sys.exit(3)", Duration::from_secs(10))
            .await
            .unwrap();

        assert_eq!(result.status, ExecStatus::Failure(Some(3)));
        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_exception_preserves_stderr() {
        let sandbox = SubprocessSandbox::new();
        let result = sandbox
            .execute("raise ValueError('boom')", Duration::from_secs(10))
            .await
            .unwrap();

        assert!(matches!(result.status, ExecStatus::Failure(Some(_))));
        assert!(result.stderr.contains("ValueError"));
        assert!(result.stderr.contains("boom"));
    }

    #[tokio::test]
    async fn test_timeout_kills_within_bound() {
        let sandbox = SubprocessSandbox::new();
        let started = Instant::now();
        let result = sandbox
            .execute("while True:\n    pass", Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(result.status, ExecStatus::TimedOut);
        // Timeout plus scheduling slack, never the full loop.
        assert!(started.elapsed() < Duration::from_secs(6));
    }

    #[tokio::test]
    async fn test_timeout_keeps_partial_output() {
        let sandbox = SubprocessSandbox::new();
        let code = "import sys, time\nprint('before')\nsys.stdout.flush()\ntime.sleep(30)";
        let result = sandbox
            .execute(code, Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(result.status, ExecStatus::TimedOut);
        assert!(result.stdout.contains("before"));
    }

    #[tokio::test]
    async fn test_no_state_survives_between_runs() {
        let sandbox = SubprocessSandbox::new();
        let first = sandbox
            .execute("x = 42\nprint(x)", Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(first.status, ExecStatus::Success);

        let second = sandbox
            .execute("print(x)", Duration::from_secs(10))
            .await
            .unwrap();
        assert!(matches!(second.status, ExecStatus::Failure(Some(_))));
        assert!(second.stderr.contains("NameError"));
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_infrastructure_error() {
        let sandbox = SubprocessSandbox::with_interpreter("codeloop-no-such-interpreter");
        let result = sandbox.execute("print(1)", Duration::from_secs(10)).await;

        assert!(result.is_err());
    }
}
