//! Version-control operations by invoking the `git` binary.
//!
//! Each function is one `git` invocation plus output translation. A non-zero
//! exit becomes `GitError::CommandFailed` carrying git's stderr, which the
//! agent surfaces to the client verbatim.

use crate::error::{GitError, Result};
use crate::types::{ChangeEntry, CommitInfo, RepoStatus};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Field separator used in the custom `git log` format.
const LOG_SEP: char = '\x1f';

/// Run `git <args>` in `repo` and return trimmed stdout.
async fn run_git(repo: &Path, args: &[&str]) -> Result<String> {
    debug!(repo = %repo.display(), ?args, "git");

    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .await
        .map_err(GitError::Spawn)?;

    if !output.status.success() {
        return Err(GitError::CommandFailed {
            command: args.first().unwrap_or(&"git").to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

/// Current branch plus porcelain change list.
pub async fn status(repo: &Path) -> Result<RepoStatus> {
    let current_branch = run_git(repo, &["rev-parse", "--abbrev-ref", "HEAD"]).await?;
    let porcelain = run_git(repo, &["status", "--porcelain"]).await?;

    let changes = porcelain
        .lines()
        .filter(|line| line.len() > 3)
        .map(|line| ChangeEntry {
            status: line[..2].to_string(),
            path: line[3..].to_string(),
        })
        .collect();

    Ok(RepoStatus {
        current_branch,
        changes,
    })
}

/// Local branch names.
pub async fn branches(repo: &Path) -> Result<Vec<String>> {
    let out = run_git(repo, &["branch", "--format=%(refname:short)"]).await?;
    Ok(out.lines().map(str::to_string).collect())
}

/// Create a branch without switching to it.
pub async fn create_branch(repo: &Path, name: &str) -> Result<()> {
    run_git(repo, &["branch", name]).await.map(|_| ())
}

/// Check out an existing branch or ref.
pub async fn checkout(repo: &Path, name: &str) -> Result<()> {
    run_git(repo, &["checkout", name]).await.map(|_| ())
}

/// Stage the given paths (`.` stages everything).
pub async fn add(repo: &Path, paths: &[String]) -> Result<()> {
    let mut args = vec!["add", "--"];
    args.extend(paths.iter().map(String::as_str));
    run_git(repo, &args).await.map(|_| ())
}

/// Commit staged changes. Author identity overrides the repo config when
/// provided, so the agent can commit on behalf of its caller.
pub async fn commit(
    repo: &Path,
    message: &str,
    author: Option<&str>,
    email: Option<&str>,
) -> Result<String> {
    let mut args: Vec<String> = Vec::new();
    if let (Some(author), Some(email)) = (author, email) {
        args.push("-c".to_string());
        args.push(format!("user.name={author}"));
        args.push("-c".to_string());
        args.push(format!("user.email={email}"));
    }
    args.extend(["commit".to_string(), "-m".to_string(), message.to_string()]);

    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    run_git(repo, &arg_refs).await?;
    run_git(repo, &["rev-parse", "HEAD"]).await
}

/// Commit history, newest first.
pub async fn history(repo: &Path, limit: usize) -> Result<Vec<CommitInfo>> {
    let count = format!("-{limit}");
    let format = format!("--pretty=format:%H{LOG_SEP}%an{LOG_SEP}%ae{LOG_SEP}%aI{LOG_SEP}%s");
    let out = run_git(repo, &["log", &count, &format]).await?;

    out.lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split(LOG_SEP).collect();
            if fields.len() != 5 {
                return Err(GitError::Parse(line.to_string()));
            }
            Ok(CommitInfo {
                hash: fields[0].to_string(),
                author: fields[1].to_string(),
                email: fields[2].to_string(),
                timestamp: fields[3].to_string(),
                message: fields[4].to_string(),
            })
        })
        .collect()
}

/// Clone `url` into `destination` (optionally a single branch).
pub async fn clone(url: &str, destination: &Path, branch: Option<&str>) -> Result<()> {
    // `git clone` has no repo to run in; use the destination's parent.
    let cwd = destination.parent().unwrap_or_else(|| Path::new("."));
    let dest = destination.display().to_string();

    let mut args = vec!["clone"];
    if let Some(branch) = branch {
        args.extend(["--branch", branch]);
    }
    args.extend([url, dest.as_str()]);

    run_git(cwd, &args).await.map(|_| ())
}

/// Fetch and integrate from the default remote.
pub async fn pull(repo: &Path) -> Result<()> {
    run_git(repo, &["pull"]).await.map(|_| ())
}

/// Push the current branch to the default remote.
pub async fn push(repo: &Path) -> Result<()> {
    run_git(repo, &["push"]).await.map(|_| ())
}
