//! Shared data types for workbench-fs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata snapshot of one directory entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    pub size: u64,
    /// Octal permission bits, e.g. `"755"`.
    pub mode: String,
    pub is_dir: bool,
    pub mod_time: Option<DateTime<Utc>>,
}

/// One matching line from a find-in-files scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMatch {
    pub file: String,
    /// 1-based line number.
    pub line: usize,
    pub content: String,
}

/// Per-file outcome of a replace-in-files request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceResult {
    pub file: String,
    pub success: bool,
    pub error: Option<String>,
}
