//! Bounded subprocess execution for CLI tools.
//!
//! Every invocation carries a timeout and an output capture limit.
//! Exceeding either kills the child: a CLI that hangs or floods its
//! stdout fails that one invocation, never the host process.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::ProcessError;

/// Default command timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default output capture limit.
const DEFAULT_OUTPUT_LIMIT: usize = 1024 * 1024;

// ============================================================================
// Process Output
// ============================================================================

/// Output from a process execution.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Standard output content.
    pub stdout: String,
    /// Standard error content.
    pub stderr: String,
    /// Exit code (0 = success).
    pub exit_code: i32,
    /// How long the command took to execute.
    pub duration: Duration,
}

impl ProcessOutput {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the stdout if successful, otherwise a `NonZeroExit` error.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::NonZeroExit` when the exit code is non-zero.
    pub fn stdout_if_success(&self) -> Result<&str, ProcessError> {
        if self.success() {
            Ok(&self.stdout)
        } else {
            Err(ProcessError::NonZeroExit {
                code: self.exit_code,
                stderr: self.stderr.clone(),
            })
        }
    }
}

// ============================================================================
// Process Runner
// ============================================================================

/// API for running subprocesses (CLI tools).
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Creates a new process runner.
    pub fn new() -> Self {
        Self
    }

    /// Run a command with the default timeout and output limit.
    ///
    /// # Errors
    ///
    /// See [`ProcessRunner::run_limited`].
    pub async fn run(&self, cmd: &str, args: &[&str]) -> Result<ProcessOutput, ProcessError> {
        self.run_limited(cmd, args, DEFAULT_TIMEOUT, DEFAULT_OUTPUT_LIMIT)
            .await
    }

    /// Run a command with an explicit timeout and output capture limit.
    ///
    /// Stdin is closed; stdout and stderr are captured incrementally so
    /// the cap is enforced while the process runs, not after.
    ///
    /// # Errors
    ///
    /// - `ProcessError::NotFound` if the command is not on PATH
    /// - `ProcessError::Timeout` if the command outlives `timeout`
    /// - `ProcessError::OutputTooLarge` if either stream exceeds `max_output`
    /// - `ProcessError::Io` on spawn/read failures
    #[instrument(skip(self), fields(cmd = %cmd))]
    pub async fn run_limited(
        &self,
        cmd: &str,
        args: &[&str],
        timeout: Duration,
        max_output: usize,
    ) -> Result<ProcessOutput, ProcessError> {
        let cmd_path = self.which(cmd).ok_or_else(|| {
            warn!(cmd = %cmd, "Command not found");
            ProcessError::NotFound(cmd.to_string())
        })?;

        debug!(args = ?args, "Running command");
        let start = Instant::now();

        let mut child = Command::new(&cmd_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ProcessError::ExecutionFailed("Failed to capture stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ProcessError::ExecutionFailed("Failed to capture stderr".to_string()))?;

        let capture = async {
            let (out, err) = tokio::try_join!(
                read_limited(stdout, max_output),
                read_limited(stderr, max_output),
            )?;
            let status = child.wait().await?;
            Ok::<_, ProcessError>((out, err, status))
        };

        // Bind before matching so the capture future (and its borrow of
        // the child) is dropped before any kill() below
        let captured = tokio::time::timeout(timeout, capture).await;

        let (out, err, status) = match captured {
            Ok(Ok(done)) => done,
            Ok(Err(e)) => {
                // Capped or broken stream: the child may still be running
                let _ = child.kill().await;
                return Err(e);
            }
            Err(_) => {
                warn!(cmd = %cmd, timeout = ?timeout, "Command timed out");
                let _ = child.kill().await;
                return Err(ProcessError::Timeout(timeout));
            }
        };

        let duration = start.elapsed();
        let exit_code = status.code().unwrap_or(-1);

        let result = ProcessOutput {
            stdout: String::from_utf8_lossy(&out).to_string(),
            stderr: String::from_utf8_lossy(&err).to_string(),
            exit_code,
            duration,
        };

        debug!(
            exit_code = exit_code,
            duration = ?duration,
            stdout_len = result.stdout.len(),
            "Command completed"
        );

        Ok(result)
    }

    /// Check if a command exists on PATH.
    pub fn command_exists(&self, cmd: &str) -> bool {
        self.which(cmd).is_some()
    }

    /// Find the path to a command.
    pub fn which(&self, cmd: &str) -> Option<PathBuf> {
        which::which(cmd).ok()
    }
}

/// Reads a stream to EOF, failing once the cap is exceeded.
async fn read_limited<R>(mut reader: R, limit: usize) -> Result<Vec<u8>, ProcessError>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        if buf.len() + n > limit {
            return Err(ProcessError::OutputTooLarge { limit });
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Ok(buf)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_exists() {
        let runner = ProcessRunner::new();

        assert!(runner.command_exists("echo"));
        assert!(!runner.command_exists("definitely_not_a_real_command_12345"));
    }

    #[tokio::test]
    async fn test_run_echo() {
        let runner = ProcessRunner::new();

        let output = runner.run("echo", &["hello", "world"]).await.unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello world");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_run_nonzero_exit() {
        let runner = ProcessRunner::new();

        let output = runner
            .run("ls", &["/definitely/not/a/real/path/12345"])
            .await
            .unwrap();

        assert!(!output.success());
        assert!(output.stdout_if_success().is_err());
    }

    #[tokio::test]
    async fn test_run_not_found() {
        let runner = ProcessRunner::new();

        let result = runner.run("not_a_real_command_xyz", &[]).await;

        assert!(matches!(result, Err(ProcessError::NotFound(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_output_cap_kills_flooding_command() {
        let runner = ProcessRunner::new();

        // 2 MiB of zeroes against a 64 KiB cap
        let result = runner
            .run_limited(
                "sh",
                &["-c", "head -c 2097152 /dev/zero"],
                Duration::from_secs(10),
                64 * 1024,
            )
            .await;

        assert!(matches!(
            result,
            Err(ProcessError::OutputTooLarge { limit }) if limit == 64 * 1024
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_hanging_command() {
        let runner = ProcessRunner::new();

        let start = Instant::now();
        let result = runner
            .run_limited(
                "sh",
                &["-c", "sleep 5"],
                Duration::from_millis(200),
                1024,
            )
            .await;

        assert!(matches!(result, Err(ProcessError::Timeout(_))));
        assert!(start.elapsed() < Duration::from_secs(3));
    }
}
