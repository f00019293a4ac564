//! workbench-exec — persistent session execution engine.
//!
//! Turns an interactive shell into a request/response and poll-able
//! resource. Each session owns one long-lived shell; every submitted command
//! is wrapped with a completion sentinel, its output redirected into a
//! per-command log file, and the log tailed until the sentinel reports the
//! exit status.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use workbench_exec::registry::SessionRegistry;
//! use workbench_exec::types::Execution;
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = SessionRegistry::new("/tmp/workbench", "/tmp");
//!
//!     let session = registry.create(None).await.unwrap();
//!     match registry.execute(&session.id, "echo hello", false).await.unwrap() {
//!         Execution::Finished { output, exit_code, .. } => {
//!             println!("{output} (exit {exit_code})");
//!         }
//!         Execution::Accepted { command_id } => println!("running as {command_id}"),
//!     }
//! }
//! ```

pub mod error;
pub mod oneshot;
pub mod registry;
pub mod sentinel;
pub mod session;
pub mod tail;
pub mod types;

pub use error::{ExecError, Result};
pub use registry::SessionRegistry;
pub use types::{
    CommandId, CommandOutcome, CommandSummary, Execution, SessionId, SessionSummary,
};
