//! Session: one long-lived shell process plus the commands submitted to it.
//!
//! A session owns the shell's stdin exclusively. Commands are not run
//! directly — each one is wrapped by the sentinel protocol, written to the
//! shell, and observed to completion by tailing the command's log file. The
//! shell executes lines strictly in the order they were written, which is
//! what serializes commands within a session.

use crate::error::{ExecError, Result};
use crate::sentinel;
use crate::tail;
use crate::types::{CommandId, CommandOutcome, CommandSummary, Execution, SessionId, SessionSummary};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{mpsc, watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Per-command bookkeeping kept in the session's command table.
///
/// The `outcome` receiver is the settle-once cell: the completion watcher
/// writes it exactly once, and any number of later lookups read the settled
/// value from it.
struct CommandHandle {
    text: String,
    created_at: DateTime<Utc>,
    log_path: PathBuf,
    outcome: watch::Receiver<Option<CommandOutcome>>,
}

impl CommandHandle {
    fn exit_code(&self) -> Option<i32> {
        match &*self.outcome.borrow() {
            Some(CommandOutcome::Completed { exit_code, .. }) => Some(*exit_code),
            _ => None,
        }
    }
}

/// A live session wrapping a single persistent shell process.
pub struct Session {
    pub id: SessionId,
    pub working_directory: PathBuf,
    pub created_at: DateTime<Utc>,

    /// Directory holding one log file per command.
    log_dir: PathBuf,

    /// Exclusive write half of the shell's stdin. The async mutex is what
    /// serializes concurrent submissions to the same session — partial
    /// writes from two callers can never interleave.
    stdin: Mutex<ChildStdin>,

    /// The shell process handle, kept for teardown.
    child: Mutex<Child>,

    /// All commands ever submitted to this session, keyed by ID.
    commands: DashMap<CommandId, CommandHandle>,

    /// Fires on session deletion; in-flight tailers and completion watchers
    /// derive child tokens from it.
    cancel: CancellationToken,
}

impl Session {
    /// Spawn the session shell rooted at `working_directory`.
    ///
    /// The shell's own stdout/stderr are discarded: every command redirects
    /// its output into its log file, so nothing useful arrives on the
    /// shell's streams.
    pub async fn spawn(id: SessionId, working_directory: PathBuf, log_dir: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&log_dir)
            .await
            .map_err(ExecError::LogCreation)?;

        let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());

        let mut child = Command::new(&shell)
            .current_dir(&working_directory)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ExecError::SpawnFailed(format!("{shell}: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExecError::SpawnFailed("shell stdin not captured".to_string()))?;

        debug!(session = %id, %shell, cwd = %working_directory.display(), "session shell spawned");

        Ok(Self {
            id,
            working_directory,
            created_at: Utc::now(),
            log_dir,
            stdin: Mutex::new(stdin),
            child: Mutex::new(child),
            commands: DashMap::new(),
            cancel: CancellationToken::new(),
        })
    }

    /// Run `text` in this session's shell.
    ///
    /// Sync (`run_async == false`): blocks until the completion marker is
    /// observed and returns the accumulated output plus exit code. Async:
    /// returns the command ID as soon as the wrapped line has been written
    /// to the shell; the outcome is recorded in the background and is
    /// observable through [`Session::command`] and the log file.
    pub async fn execute(&self, text: &str, run_async: bool) -> Result<Execution> {
        if text.trim().is_empty() {
            return Err(ExecError::EmptyCommand);
        }

        let command_id = CommandId::new();
        let log_path = self.log_dir.join(format!("{command_id}.log"));

        // Create the log file before dispatch so the tailer and later log
        // requests always have something to open.
        tokio::fs::File::create(&log_path)
            .await
            .map_err(ExecError::LogCreation)?;
        let read_handle = tokio::fs::File::open(&log_path)
            .await
            .map_err(ExecError::LogCreation)?;

        let (outcome_tx, outcome_rx) = watch::channel(None);
        self.commands.insert(
            command_id.clone(),
            CommandHandle {
                text: text.to_string(),
                created_at: Utc::now(),
                log_path: log_path.clone(),
                outcome: outcome_rx.clone(),
            },
        );

        // One tailer plus one completion watcher per in-flight command; both
        // stop when the command settles or the session goes away. The watcher
        // only starts once the command has actually reached the shell.
        let command_cancel = self.cancel.child_token();
        let (chunks, errors) = tail::spawn(read_handle, true, command_cancel.clone());

        let line = sentinel::wrap(text, &log_path);
        {
            let mut stdin = self.stdin.lock().await;
            let write = async {
                stdin.write_all(line.as_bytes()).await?;
                stdin.flush().await
            };
            if let Err(e) = write.await {
                // Nothing will ever reach the log file; stop the tailer and
                // settle the record with the dispatch failure.
                command_cancel.cancel();
                let _ = outcome_tx.send(Some(CommandOutcome::Failed {
                    message: "command was never dispatched: stdin write failed".to_string(),
                }));
                return Err(ExecError::StdinWrite(e));
            }
        }

        tokio::spawn(watch_completion(
            chunks,
            errors,
            outcome_tx,
            command_cancel.clone(),
        ));

        debug!(session = %self.id, command = %command_id, background = run_async, "command dispatched");

        if run_async {
            return Ok(Execution::Accepted { command_id });
        }

        let mut rx = outcome_rx;
        let settled = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| ExecError::Stream("completion watcher exited unexpectedly".to_string()))?
            .clone();

        match settled {
            Some(CommandOutcome::Completed { output, exit_code }) => Ok(Execution::Finished {
                command_id,
                output,
                exit_code,
            }),
            Some(CommandOutcome::Failed { message }) => Err(ExecError::Stream(message)),
            // wait_for only returns once the cell holds Some.
            None => Err(ExecError::Stream("command never settled".to_string())),
        }
    }

    /// Snapshot one command.
    pub fn command(&self, id: &CommandId) -> Result<CommandSummary> {
        let handle = self
            .commands
            .get(id)
            .ok_or_else(|| ExecError::CommandNotFound(id.to_string()))?;
        Ok(CommandSummary {
            id: id.clone(),
            command: handle.text.clone(),
            exit_code: handle.exit_code(),
            created_at: handle.created_at,
        })
    }

    /// Path of one command's log file.
    pub fn command_log_path(&self, id: &CommandId) -> Result<PathBuf> {
        let handle = self
            .commands
            .get(id)
            .ok_or_else(|| ExecError::CommandNotFound(id.to_string()))?;
        Ok(handle.log_path.clone())
    }

    /// Snapshot the session with all its commands.
    pub fn summary(&self) -> SessionSummary {
        let mut commands: Vec<CommandSummary> = self
            .commands
            .iter()
            .map(|entry| CommandSummary {
                id: entry.key().clone(),
                command: entry.text.clone(),
                exit_code: entry.exit_code(),
                created_at: entry.created_at,
            })
            .collect();
        commands.sort_by_key(|c| c.created_at);

        SessionSummary {
            id: self.id.clone(),
            working_directory: self.working_directory.display().to_string(),
            created_at: self.created_at,
            commands,
        }
    }

    /// Tear the session down: stop all in-flight tailers and watchers, then
    /// kill the shell. In-flight commands settle with a failure outcome
    /// rather than hanging.
    pub async fn close(&self) {
        self.cancel.cancel();

        let mut child = self.child.lock().await;
        match child.kill().await {
            Ok(()) => info!(session = %self.id, "session shell terminated"),
            // Already exited on its own — nothing to do.
            Err(e) => debug!(session = %self.id, "session shell kill: {e}"),
        }
    }

    /// Exposed for tests and diagnostics: where this session's logs live.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Consume tailer output until the command settles, then write the outcome
/// exactly once.
///
/// Each chunk is appended to the accumulated text and the whole accumulation
/// is rescanned for the sentinel, so a marker split across two tailer reads
/// is still recognized once its second half arrives.
async fn watch_completion(
    mut chunks: mpsc::Receiver<Vec<u8>>,
    mut errors: mpsc::Receiver<io::Error>,
    outcome: watch::Sender<Option<CommandOutcome>>,
    cancel: CancellationToken,
) {
    let mut text = String::new();
    let mut errors_open = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = outcome.send(Some(CommandOutcome::Failed {
                    message: "session closed before command completed".to_string(),
                }));
                return;
            }
            chunk = chunks.recv() => match chunk {
                Some(bytes) => {
                    text.push_str(&String::from_utf8_lossy(&bytes));
                    let (code, visible) = sentinel::extract(&text);
                    if let Some(exit_code) = code {
                        let _ = outcome.send(Some(CommandOutcome::Completed {
                            output: visible,
                            exit_code,
                        }));
                        // Stop the tailer; the command is settled.
                        cancel.cancel();
                        return;
                    }
                }
                None => {
                    let _ = outcome.send(Some(CommandOutcome::Failed {
                        message: "log stream ended before completion marker".to_string(),
                    }));
                    return;
                }
            },
            err = errors.recv(), if errors_open => match err {
                Some(e) => {
                    warn!("log tail failed mid-command: {e}");
                    let _ = outcome.send(Some(CommandOutcome::Failed {
                        message: e.to_string(),
                    }));
                    cancel.cancel();
                    return;
                }
                None => errors_open = false,
            },
        }
    }
}
