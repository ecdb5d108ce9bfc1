//! Line-delimited JSON-RPC subprocess probing.
//!
//! Some CLI tools expose a long-lived server mode speaking newline
//! delimited JSON-RPC over stdin/stdout. The probe spawns the tool,
//! writes a single request, and scans output lines for the first
//! syntactically valid JSON object. That object is the result - even if
//! the tool framed it differently than asked - and the subprocess is
//! terminated as soon as it appears.

use serde_json::Value;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, instrument, trace};

use crate::error::RpcError;

/// Default timeout for the whole exchange.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Probe for a JSON-RPC-speaking subprocess.
#[derive(Debug, Clone)]
pub struct RpcProbe {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl RpcProbe {
    /// Creates a probe for the given command and server-mode arguments.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the exchange timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends one JSON-RPC request and returns the first valid JSON object
    /// the subprocess writes.
    ///
    /// On timeout the subprocess is killed and only this invocation fails.
    ///
    /// # Errors
    ///
    /// - `RpcError::NotFound` if the command is not on PATH
    /// - `RpcError::SpawnFailed` if the subprocess could not start
    /// - `RpcError::Timeout` if no valid line appears in time
    /// - `RpcError::ClosedWithoutResponse` if the subprocess exits first
    #[instrument(skip(self), fields(cmd = %self.command))]
    pub async fn request(&self, method: &str) -> Result<Value, RpcError> {
        let cmd_path = which::which(&self.command)
            .map_err(|_| RpcError::NotFound(self.command.clone()))?;

        debug!(args = ?self.args, method = %method, "Spawning RPC subprocess");

        let mut child = Command::new(&cmd_path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RpcError::SpawnFailed(e.to_string()))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RpcError::SpawnFailed("Failed to open stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RpcError::SpawnFailed("Failed to open stdout".to_string()))?;

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": {},
        });

        let exchange = async {
            // The tool may answer without ever reading its input, so a
            // failed write (e.g. broken pipe after early exit) is not fatal.
            let line = format!("{request}\n");
            if let Err(e) = stdin.write_all(line.as_bytes()).await {
                debug!(error = %e, "RPC request write failed, still reading output");
            }
            let _ = stdin.flush().await;

            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                let trimmed = line.trim();
                if !trimmed.starts_with('{') {
                    continue;
                }
                match serde_json::from_str::<Value>(trimmed) {
                    Ok(value) => {
                        trace!(line = %trimmed, "First valid JSON object");
                        return Ok(value);
                    }
                    Err(_) => {
                        // Partial or garbled line, keep scanning
                        continue;
                    }
                }
            }

            Err(RpcError::ClosedWithoutResponse)
        };

        let result = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(RpcError::Timeout(self.timeout)),
        };

        // Terminate whether we resolved, timed out, or hit EOF
        let _ = child.kill().await;

        result
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    fn sh(script: &str) -> RpcProbe {
        RpcProbe::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[tokio::test]
    async fn test_resolves_first_valid_json_line() {
        let probe = sh(r#"echo 'starting up'; echo '{"usedPercent": 42}'"#);

        let value = probe.request("getUsage").await.unwrap();
        assert_eq!(value["usedPercent"], 42);
    }

    #[tokio::test]
    async fn test_skips_invalid_brace_lines() {
        let probe = sh(r#"echo '{ not json'; echo '{"ok": true}'"#);

        let value = probe.request("getUsage").await.unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_exit_without_response() {
        let probe = sh("true");

        let result = probe.request("getUsage").await;
        assert!(matches!(result, Err(RpcError::ClosedWithoutResponse)));
    }

    #[tokio::test]
    async fn test_timeout_kills_silent_subprocess() {
        let probe = sh("sleep 5").with_timeout(Duration::from_millis(200));

        let start = Instant::now();
        let result = probe.request("getUsage").await;

        assert!(matches!(result, Err(RpcError::Timeout(_))));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_command_not_found() {
        let probe = RpcProbe::new("not_a_real_command_xyz", vec![]);

        let result = probe.request("getUsage").await;
        assert!(matches!(result, Err(RpcError::NotFound(_))));
    }
}
