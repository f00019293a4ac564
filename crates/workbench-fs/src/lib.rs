//! workbench-fs — thin file-system operations for the workbench agent.
//!
//! Every operation is a single OS call (or a bounded walk) translated into
//! the crate error type; there is no shared state and no ordering to get
//! wrong. The execution engine lives elsewhere.

pub mod error;
pub mod ops;
pub mod search;
pub mod types;

pub use error::{FsError, Result};
pub use types::{FileInfo, FileMatch, ReplaceResult};
