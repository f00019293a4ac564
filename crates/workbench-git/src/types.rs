//! Shared data types for workbench-git.

use serde::{Deserialize, Serialize};

/// One entry of `git status --porcelain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEntry {
    /// The two-character porcelain status code, e.g. `"M "` or `"??"`.
    pub status: String,
    pub path: String,
}

/// Working-tree status snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStatus {
    pub current_branch: String,
    pub changes: Vec<ChangeEntry>,
}

/// One commit from the history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub hash: String,
    pub author: String,
    pub email: String,
    /// Author date, RFC 3339.
    pub timestamp: String,
    pub message: String,
}
