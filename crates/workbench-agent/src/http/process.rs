//! Handlers for /process — one-shot execution and session execution.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use workbench_exec::{CommandId, CommandSummary, Execution, SessionId, SessionSummary};

use crate::app::AppState;
use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub command: String,
    pub timeout: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub code: i32,
    pub result: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Defaults to the configured project directory.
    pub working_directory: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExecuteRequest {
    pub command: String,
    /// When set, respond 202 with the command ID instead of blocking.
    #[serde(rename = "async", default)]
    pub run_async: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExecuteResponse {
    pub command_id: CommandId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

// ---------------------------------------------------------------------------
// One-shot execution
// ---------------------------------------------------------------------------

/// POST /process/execute
pub async fn execute(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    let result =
        workbench_exec::oneshot::run(&req.command, &state.project_dir(), req.timeout).await?;
    Ok(Json(ExecuteResponse {
        code: result.exit_code,
        result: result.output,
    }))
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// POST /process/session
///
/// Every field is optional, so the body may be omitted entirely.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<Json<SessionSummary>, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let cwd = req.working_directory.map(PathBuf::from);
    let summary = state.registry.create(cwd).await?;
    Ok(Json(summary))
}

/// GET /process/session
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<Vec<SessionSummary>> {
    Json(state.registry.list())
}

/// GET /process/session/{sessionId}
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSummary>, ApiError> {
    let session = state.registry.get(&SessionId::from(session_id))?;
    Ok(Json(session.summary()))
}

/// DELETE /process/session/{sessionId}
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.registry.delete(&SessionId::from(session_id)).await?;
    Ok(StatusCode::OK)
}

// ---------------------------------------------------------------------------
// Session execution and polling
// ---------------------------------------------------------------------------

/// POST /process/session/{sessionId}/exec
///
/// Sync: 200 with the command's output and exit code. Async: 202 with the
/// command ID; poll the command endpoint for the exit code.
pub async fn session_execute(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SessionExecuteRequest>,
) -> Result<Response, ApiError> {
    let execution = state
        .registry
        .execute(&SessionId::from(session_id), &req.command, req.run_async)
        .await?;

    let response = match execution {
        Execution::Accepted { command_id } => (
            StatusCode::ACCEPTED,
            Json(SessionExecuteResponse {
                command_id,
                output: None,
                exit_code: None,
            }),
        ),
        Execution::Finished {
            command_id,
            output,
            exit_code,
        } => (
            StatusCode::OK,
            Json(SessionExecuteResponse {
                command_id,
                output: Some(output),
                exit_code: Some(exit_code),
            }),
        ),
    };
    Ok(response.into_response())
}

/// GET /process/session/{sessionId}/command/{commandId}
pub async fn get_command(
    State(state): State<Arc<AppState>>,
    Path((session_id, command_id)): Path<(String, String)>,
) -> Result<Json<CommandSummary>, ApiError> {
    let summary = state
        .registry
        .command(&SessionId::from(session_id), &CommandId::from(command_id))?;
    Ok(Json(summary))
}

/// GET /process/session/{sessionId}/command/{commandId}/logs
///
/// Raw log content as written by the shell so far — including the sentinel
/// marker line once the command has completed.
pub async fn get_command_logs(
    State(state): State<Arc<AppState>>,
    Path((session_id, command_id)): Path<(String, String)>,
) -> Result<String, ApiError> {
    let log = state
        .registry
        .command_log(&SessionId::from(session_id), &CommandId::from(command_id))
        .await?;
    Ok(log)
}
