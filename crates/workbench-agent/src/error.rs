//! HTTP error mapping.
//!
//! Every subsystem error converts into an [`ApiError`] carrying the status
//! code, a short machine-readable code, and the human-readable message. The
//! JSON body is always `{"error": <message>, "code": <code>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use workbench_exec::ExecError;
use workbench_fs::FsError;
use workbench_git::GitError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.message,
            "code": self.code,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ExecError> for ApiError {
    fn from(err: ExecError) -> Self {
        let (status, code) = match &err {
            ExecError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            ExecError::CommandNotFound(_) => (StatusCode::NOT_FOUND, "COMMAND_NOT_FOUND"),
            ExecError::EmptyCommand => (StatusCode::BAD_REQUEST, "EMPTY_COMMAND"),
            ExecError::SpawnFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SPAWN_FAILED"),
            ExecError::LogCreation(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LOG_CREATION_FAILED"),
            ExecError::StdinWrite(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STDIN_WRITE_FAILED"),
            ExecError::Stream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STREAM_ERROR"),
            ExecError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };
        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl From<FsError> for ApiError {
    fn from(err: FsError) -> Self {
        let (status, code) = match &err {
            FsError::NotFound(_) => (StatusCode::NOT_FOUND, "PATH_NOT_FOUND"),
            FsError::InvalidMode(_) => (StatusCode::BAD_REQUEST, "INVALID_MODE"),
            FsError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };
        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl From<GitError> for ApiError {
    fn from(err: GitError) -> Self {
        let (status, code) = match &err {
            // Git rejecting the request (bad branch, nothing staged, …) is
            // the client's problem, not the agent's.
            GitError::CommandFailed { .. } => (StatusCode::BAD_REQUEST, "GIT_COMMAND_FAILED"),
            GitError::Spawn(_) => (StatusCode::INTERNAL_SERVER_ERROR, "GIT_UNAVAILABLE"),
            GitError::Parse(_) => (StatusCode::INTERNAL_SERVER_ERROR, "GIT_PARSE_ERROR"),
        };
        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}
