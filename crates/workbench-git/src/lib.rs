//! workbench-git — thin version-control operations for the workbench agent.
//!
//! Everything shells out to the `git` binary; this crate only builds
//! argument lists and translates results. It holds no state.

pub mod error;
pub mod repo;
pub mod types;

pub use error::{GitError, Result};
pub use types::{ChangeEntry, CommitInfo, RepoStatus};
