use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use workbench_core::WorkbenchConfig;
use workbench_exec::SessionRegistry;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: WorkbenchConfig,
    pub registry: SessionRegistry,
}

impl AppState {
    pub fn new(config: WorkbenchConfig) -> Self {
        let registry = SessionRegistry::new(
            PathBuf::from(&config.paths.state),
            PathBuf::from(&config.paths.project),
        );
        Self { config, registry }
    }

    pub fn project_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.paths.project)
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/project-dir", get(crate::http::health::project_dir_handler))
        // process — one-shot and session execution
        .route("/process/execute", post(crate::http::process::execute))
        .route(
            "/process/session",
            get(crate::http::process::list_sessions).post(crate::http::process::create_session),
        )
        .route(
            "/process/session/{sessionId}",
            get(crate::http::process::get_session).delete(crate::http::process::delete_session),
        )
        .route(
            "/process/session/{sessionId}/exec",
            post(crate::http::process::session_execute),
        )
        .route(
            "/process/session/{sessionId}/command/{commandId}",
            get(crate::http::process::get_command),
        )
        .route(
            "/process/session/{sessionId}/command/{commandId}/logs",
            get(crate::http::process::get_command_logs),
        )
        // files — thin delegations
        .route(
            "/files",
            get(crate::http::files::list).delete(crate::http::files::delete_entry),
        )
        .route("/files/info", get(crate::http::files::info))
        .route("/files/download", get(crate::http::files::download))
        .route("/files/upload", post(crate::http::files::upload))
        .route("/files/folder", post(crate::http::files::create_folder))
        .route("/files/move", post(crate::http::files::move_entry))
        .route("/files/permissions", post(crate::http::files::permissions))
        .route("/files/search", get(crate::http::files::search))
        .route("/files/find", get(crate::http::files::find))
        .route("/files/replace", post(crate::http::files::replace))
        // git — thin delegations
        .route("/git/status", get(crate::http::git::status))
        .route(
            "/git/branches",
            get(crate::http::git::branches).post(crate::http::git::create_branch),
        )
        .route("/git/history", get(crate::http::git::history))
        .route("/git/checkout", post(crate::http::git::checkout))
        .route("/git/add", post(crate::http::git::add))
        .route("/git/commit", post(crate::http::git::commit))
        .route("/git/clone", post(crate::http::git::clone))
        .route("/git/pull", post(crate::http::git::pull))
        .route("/git/push", post(crate::http::git::push))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn scratch_router(dir: &tempfile::TempDir) -> Router {
        let mut config = WorkbenchConfig::default();
        config.paths.project = dir.path().display().to_string();
        config.paths.state = dir.path().join("state").display().to_string();
        build_router(Arc::new(AppState::new(config)))
    }

    #[tokio::test]
    async fn health_route_responds_ok() {
        let dir = tempfile::tempdir().unwrap();
        let response = scratch_router(&dir)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_session_answers_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let response = scratch_router(&dir)
            .oneshot(
                Request::get("/process/session/no-such-session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_session_accepts_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        let router = scratch_router(&dir);

        let response = router
            .oneshot(
                Request::post("/process/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
