//! Error types for the workbench-git crate.

use thiserror::Error;

/// All errors that can originate from version-control operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary could not be spawned.
    #[error("failed to run git: {0}")]
    Spawn(std::io::Error),

    /// Git ran but exited non-zero; carries its stderr.
    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// Git produced output we could not interpret.
    #[error("unexpected git output: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, GitError>;
