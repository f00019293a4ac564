//! Error types for the workbench-fs crate.

use thiserror::Error;

/// All errors that can originate from file-system operations.
#[derive(Debug, Error)]
pub enum FsError {
    /// The requested path does not exist.
    #[error("path not found: {0}")]
    NotFound(String),

    /// A permissions string could not be parsed as an octal mode.
    #[error("invalid mode: {0}")]
    InvalidMode(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FsError>;
