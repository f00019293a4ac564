//! Error types for the workbench-exec crate.

use thiserror::Error;

/// All errors that can originate from the session execution engine.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The requested session ID does not exist in the registry.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The requested command ID does not exist in the session.
    #[error("command not found: {0}")]
    CommandNotFound(String),

    /// The submitted command text was blank.
    #[error("command cannot be empty")]
    EmptyCommand,

    /// The session shell (or a one-shot child) could not be spawned.
    #[error("failed to spawn shell: {0}")]
    SpawnFailed(String),

    /// The command's log file or its parent directory could not be created.
    #[error("failed to create log file: {0}")]
    LogCreation(std::io::Error),

    /// Writing the wrapped command line to the shell's stdin failed.
    #[error("failed to write command to shell: {0}")]
    StdinWrite(std::io::Error),

    /// The log stream failed before a completion marker was observed, or
    /// the session was torn down while the command was in flight.
    #[error("command stream error: {0}")]
    Stream(String),

    /// Underlying I/O failure (log reads, teardown).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ExecError>;
