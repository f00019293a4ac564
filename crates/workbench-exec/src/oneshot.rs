//! One-shot execution outside any session.
//!
//! Runs `sh -c <command>` as a fresh child, captures its combined output,
//! and returns when it exits. No session, no log file, no sentinel — the
//! child's exit status is reported directly by the OS.

use crate::error::{ExecError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Hard cap on the one-shot timeout (5 minutes).
const MAX_TIMEOUT_SECS: u64 = 300;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneshotOutput {
    pub exit_code: i32,
    /// Stdout followed by stderr.
    pub output: String,
}

/// Execute `command` via `sh -c` in `cwd`, killing it after the timeout.
pub async fn run(command: &str, cwd: &Path, timeout_secs: Option<u64>) -> Result<OneshotOutput> {
    if command.trim().is_empty() {
        return Err(ExecError::EmptyCommand);
    }
    debug!(%command, "one-shot exec");

    let timeout = Duration::from_secs(
        timeout_secs
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .min(MAX_TIMEOUT_SECS),
    );

    let child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ExecError::SpawnFailed(e.to_string()))?;

    // `wait_with_output` takes the child by value, so it runs on a spawned
    // task and reports back over a oneshot channel. The PID is captured
    // first for the kill-on-timeout path.
    let pid = child.id();
    let (tx, rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send(child.wait_with_output().await);
    });

    match tokio::time::timeout(timeout, rx).await {
        Ok(Ok(Ok(output))) => {
            let exit_code = output.status.code().unwrap_or(-1);
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            Ok(OneshotOutput {
                exit_code,
                output: text,
            })
        }
        Ok(Ok(Err(e))) => Err(ExecError::Io(e)),
        Ok(Err(_recv_err)) => Err(ExecError::SpawnFailed(
            "wait task panicked unexpectedly".to_string(),
        )),
        Err(_elapsed) => {
            // The Child handle is owned by the wait task; SIGKILL by PID is
            // what remains.
            if let Some(raw_pid) = pid {
                #[cfg(unix)]
                // Safety: raw_pid is our direct child, still running.
                unsafe {
                    libc::kill(raw_pid as libc::pid_t, libc::SIGKILL);
                }
            }
            Err(ExecError::Stream(format!(
                "command timed out after {}s",
                timeout.as_secs()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cwd() -> PathBuf {
        std::env::temp_dir()
    }

    #[tokio::test]
    async fn captures_output_and_exit_code() {
        let result = run("echo out; echo err 1>&2; exit 4", &cwd(), None)
            .await
            .unwrap();
        assert_eq!(result.exit_code, 4);
        assert!(result.output.contains("out\n"));
        assert!(result.output.contains("err\n"));
    }

    #[tokio::test]
    async fn rejects_blank_command() {
        assert!(matches!(
            run("  ", &cwd(), None).await,
            Err(ExecError::EmptyCommand)
        ));
    }

    #[tokio::test]
    async fn kills_child_on_timeout() {
        let err = run("sleep 30", &cwd(), Some(1)).await.unwrap_err();
        assert!(matches!(err, ExecError::Stream(_)));
    }
}
