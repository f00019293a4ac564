//! Shared data types for workbench-exec.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// Opaque identifier for a session.
///
/// Wraps a `String` so the internal representation can change without
/// breaking callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a fresh random session ID (UUIDv4).
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// CommandId
// ---------------------------------------------------------------------------

/// Opaque identifier for a command submitted to a session.
///
/// Follows the same pattern as `SessionId` — a thin wrapper around a UUID
/// string. Unique within its owning session; generated fresh per submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandId(pub String);

impl CommandId {
    /// Generate a fresh random command ID (UUIDv4).
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CommandId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CommandId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CommandId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// CommandOutcome
// ---------------------------------------------------------------------------

/// Terminal state of one command, settled exactly once by its completion
/// watcher. Sync waiters and later pollers both read the same settled value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The completion marker was observed in the log stream.
    Completed { output: String, exit_code: i32 },

    /// The log stream failed, or the session was deleted mid-flight.
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// What `Session::execute` hands back to the caller.
#[derive(Debug, Clone)]
pub enum Execution {
    /// Async submission: the command was written to the shell and continues
    /// in the background; poll with the command ID.
    Accepted { command_id: CommandId },

    /// Sync submission: the command ran to completion.
    Finished {
        command_id: CommandId,
        output: String,
        exit_code: i32,
    },
}

// ---------------------------------------------------------------------------
// Wire snapshots
// ---------------------------------------------------------------------------

/// Snapshot of one command — returned by session/command lookups.
///
/// `exit_code` is `None` while the command is still running; once present it
/// never changes, so repeated polls are idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSummary {
    pub id: CommandId,
    pub command: String,
    pub exit_code: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a live session — returned by create/get/list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: SessionId,
    pub working_directory: String,
    pub created_at: DateTime<Utc>,
    pub commands: Vec<CommandSummary>,
}
