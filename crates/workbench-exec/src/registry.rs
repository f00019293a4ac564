//! Session registry — the process-wide authoritative map of live sessions.
//!
//! All session state is in-memory; an agent restart forgets every session.
//! The `DashMap` gives concurrent request handlers a safe view without a
//! global lock around the whole registry.

use crate::error::{ExecError, Result};
use crate::session::Session;
use crate::types::{CommandId, CommandSummary, Execution, SessionId, SessionSummary};
use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<Session>>,

    /// `<state dir>/sessions` — each session gets a subdirectory of log files.
    sessions_dir: PathBuf,

    /// Working directory for sessions whose create request names none.
    default_root: PathBuf,
}

impl SessionRegistry {
    pub fn new(state_dir: impl Into<PathBuf>, default_root: impl Into<PathBuf>) -> Self {
        Self {
            sessions: DashMap::new(),
            sessions_dir: state_dir.into().join("sessions"),
            default_root: default_root.into(),
        }
    }

    /// Spawn a new session shell and register it.
    pub async fn create(&self, working_directory: Option<PathBuf>) -> Result<SessionSummary> {
        let id = SessionId::new();
        let cwd = working_directory.unwrap_or_else(|| self.default_root.clone());
        let log_dir = self.sessions_dir.join(id.as_str());

        let session = Session::spawn(id.clone(), cwd, log_dir).await?;
        let summary = session.summary();

        info!(session = %id, cwd = %summary.working_directory, "session created");
        self.sessions.insert(id, Arc::new(session));
        Ok(summary)
    }

    pub fn get(&self, id: &SessionId) -> Result<Arc<Session>> {
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ExecError::SessionNotFound(id.to_string()))
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn list(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .iter()
            .map(|entry| entry.value().summary())
            .collect();
        summaries.sort_by_key(|s| s.created_at);
        summaries
    }

    /// Terminate a session's shell and forget it.
    ///
    /// In-flight commands settle with a failure outcome; their log files are
    /// left on disk. A second delete of the same ID fails with not-found.
    pub async fn delete(&self, id: &SessionId) -> Result<()> {
        let (_, session) = self
            .sessions
            .remove(id)
            .ok_or_else(|| ExecError::SessionNotFound(id.to_string()))?;

        session.close().await;
        info!(session = %id, "session deleted");
        Ok(())
    }

    /// Run a command in an existing session (the execution orchestrator's
    /// registry-level entry point).
    pub async fn execute(&self, id: &SessionId, text: &str, run_async: bool) -> Result<Execution> {
        self.get(id)?.execute(text, run_async).await
    }

    pub fn command(&self, session: &SessionId, command: &CommandId) -> Result<CommandSummary> {
        self.get(session)?.command(command)
    }

    /// Raw log content for one command, as written by the shell so far.
    pub async fn command_log(&self, session: &SessionId, command: &CommandId) -> Result<String> {
        let path = self.get(session)?.command_log_path(command)?;
        let bytes = tokio::fs::read(&path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn scratch_registry(dir: &tempfile::TempDir) -> SessionRegistry {
        SessionRegistry::new(dir.path().join("state"), dir.path().to_path_buf())
    }

    #[tokio::test]
    async fn create_get_list_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let registry = scratch_registry(&dir);

        let created = registry.create(None).await.unwrap();
        assert!(registry.get(&created.id).is_ok());
        assert_eq!(registry.list().len(), 1);

        registry.delete(&created.id).await.unwrap();
        assert!(registry.list().is_empty());
        assert!(matches!(
            registry.get(&created.id),
            Err(ExecError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_unknown_session_fails_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let registry = scratch_registry(&dir);
        let keeper = registry.create(None).await.unwrap();

        assert!(matches!(
            registry.delete(&SessionId::new()).await,
            Err(ExecError::SessionNotFound(_))
        ));
        // The existing session is untouched.
        assert!(registry.get(&keeper.id).is_ok());
    }

    #[tokio::test]
    async fn second_delete_of_same_id_fails() {
        let dir = tempfile::tempdir().unwrap();
        let registry = scratch_registry(&dir);

        let created = registry.create(None).await.unwrap();
        registry.delete(&created.id).await.unwrap();
        assert!(matches!(
            registry.delete(&created.id).await,
            Err(ExecError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn submissions_after_delete_fail_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let registry = scratch_registry(&dir);

        let created = registry.create(None).await.unwrap();
        registry.delete(&created.id).await.unwrap();

        assert!(matches!(
            registry.execute(&created.id, "true", false).await,
            Err(ExecError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn sessions_use_requested_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let registry = scratch_registry(&dir);
        let subdir = dir.path().join("sub");
        std::fs::create_dir(&subdir).unwrap();

        let created = registry
            .create(Some(subdir.canonicalize().unwrap()))
            .await
            .unwrap();

        match registry.execute(&created.id, "pwd", false).await.unwrap() {
            Execution::Finished { output, exit_code, .. } => {
                assert_eq!(exit_code, 0);
                assert_eq!(
                    output.trim_end(),
                    subdir.canonicalize().unwrap().display().to_string()
                );
            }
            other => panic!("expected Finished, got {other:?}"),
        }
        registry.delete(&created.id).await.unwrap();
    }

    #[tokio::test]
    async fn delete_settles_in_flight_async_command() {
        let dir = tempfile::tempdir().unwrap();
        let registry = scratch_registry(&dir);
        let created = registry.create(None).await.unwrap();

        let command_id = match registry
            .execute(&created.id, "sleep 30", true)
            .await
            .unwrap()
        {
            Execution::Accepted { command_id } => command_id,
            other => panic!("expected Accepted, got {other:?}"),
        };

        // Delete must cancel the in-flight tailer and watcher, not wait out
        // the sleep.
        tokio::time::timeout(Duration::from_secs(5), registry.delete(&created.id))
            .await
            .expect("delete must not hang on an in-flight command")
            .unwrap();

        assert!(matches!(
            registry.command(&created.id, &command_id),
            Err(ExecError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_unblocks_sync_waiter() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(scratch_registry(&dir));
        let created = registry.create(None).await.unwrap();

        let waiter = {
            let registry = Arc::clone(&registry);
            let id = created.id.clone();
            tokio::spawn(async move { registry.execute(&id, "sleep 30", false).await })
        };
        // Let the command reach the shell before tearing the session down.
        tokio::time::sleep(Duration::from_millis(200)).await;

        registry.delete(&created.id).await.unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("sync waiter must settle after delete")
            .unwrap();
        assert!(matches!(result, Err(ExecError::Stream(_))));
    }

    #[tokio::test]
    async fn command_log_returns_raw_file_content() {
        let dir = tempfile::tempdir().unwrap();
        let registry = scratch_registry(&dir);
        let created = registry.create(None).await.unwrap();

        let command_id = match registry
            .execute(&created.id, "printf 'line1\\nline2\\n'", false)
            .await
            .unwrap()
        {
            Execution::Finished { command_id, .. } => command_id,
            other => panic!("expected Finished, got {other:?}"),
        };

        let log = registry.command_log(&created.id, &command_id).await.unwrap();
        // The raw log keeps the marker line; only the returned output strips it.
        assert!(log.starts_with("line1\nline2\n"));
        registry.delete(&created.id).await.unwrap();
    }
}
