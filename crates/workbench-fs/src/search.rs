//! Recursive name search, find-in-files, and replace-in-files.
//!
//! Walks are iterative (a worklist of directories) rather than recursive so
//! the async functions stay boxless. Text scans read file contents through a
//! lossy UTF-8 conversion, so binary files are searched on a best-effort
//! basis rather than skipped.

use crate::error::Result;
use crate::types::{FileMatch, ReplaceResult};
use std::path::{Path, PathBuf};

/// Walk `root` and return every file whose name contains `pattern`.
pub async fn search_names(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let mut matches = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // Unreadable subdirectories are skipped, not fatal.
            Err(_) => continue,
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
            } else if path
                .file_name()
                .map(|n| n.to_string_lossy().contains(pattern))
                .unwrap_or(false)
            {
                matches.push(path);
            }
        }
    }
    matches.sort();
    Ok(matches)
}

/// Walk `root` and return every line of every file containing `pattern`.
pub async fn find_in_files(root: &Path, pattern: &str) -> Result<Vec<FileMatch>> {
    let mut matches = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
                continue;
            }
            let Ok(bytes) = tokio::fs::read(&path).await else {
                continue;
            };
            let text = String::from_utf8_lossy(&bytes);
            for (idx, line) in text.lines().enumerate() {
                if line.contains(pattern) {
                    matches.push(FileMatch {
                        file: path.display().to_string(),
                        line: idx + 1,
                        content: line.to_string(),
                    });
                }
            }
        }
    }
    matches.sort_by(|a, b| (a.file.as_str(), a.line).cmp(&(b.file.as_str(), b.line)));
    Ok(matches)
}

/// Replace every literal occurrence of `pattern` with `new_value` in each
/// named file. Per-file failures are reported, not propagated — one
/// unreadable file must not abort the batch.
pub async fn replace_in_files(
    files: &[PathBuf],
    pattern: &str,
    new_value: &str,
) -> Vec<ReplaceResult> {
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let outcome = replace_one(path, pattern, new_value).await;
        results.push(match outcome {
            Ok(()) => ReplaceResult {
                file: path.display().to_string(),
                success: true,
                error: None,
            },
            Err(e) => ReplaceResult {
                file: path.display().to_string(),
                success: false,
                error: Some(e.to_string()),
            },
        });
    }
    results
}

async fn replace_one(path: &Path, pattern: &str, new_value: &str) -> Result<()> {
    let contents = tokio::fs::read_to_string(path).await?;
    let replaced = contents.replace(pattern, new_value);
    if replaced != contents {
        tokio::fs::write(path, replaced).await?;
    }
    Ok(())
}
