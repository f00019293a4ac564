//! Handlers for /git — thin version-control delegations.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use workbench_git::{CommitInfo, RepoStatus};

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RepoQuery {
    /// Repository path — defaults to the project directory.
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub path: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRequest {
    pub path: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    pub path: Option<String>,
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub path: Option<String>,
    pub message: String,
    pub author: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub hash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneRequest {
    pub url: String,
    pub destination: String,
    pub branch: Option<String>,
}

fn repo(state: &AppState, path: Option<String>) -> PathBuf {
    path.map(PathBuf::from).unwrap_or_else(|| state.project_dir())
}

/// GET /git/status
pub async fn status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RepoQuery>,
) -> Result<Json<RepoStatus>, ApiError> {
    Ok(Json(workbench_git::repo::status(&repo(&state, query.path)).await?))
}

/// GET /git/branches
pub async fn branches(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RepoQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(
        workbench_git::repo::branches(&repo(&state, query.path)).await?,
    ))
}

/// POST /git/branches
pub async fn create_branch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BranchRequest>,
) -> Result<StatusCode, ApiError> {
    workbench_git::repo::create_branch(&repo(&state, req.path), &req.name).await?;
    Ok(StatusCode::OK)
}

/// GET /git/history
pub async fn history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<CommitInfo>>, ApiError> {
    Ok(Json(
        workbench_git::repo::history(&repo(&state, query.path), query.limit).await?,
    ))
}

/// POST /git/checkout
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BranchRequest>,
) -> Result<StatusCode, ApiError> {
    workbench_git::repo::checkout(&repo(&state, req.path), &req.name).await?;
    Ok(StatusCode::OK)
}

/// POST /git/add
pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddRequest>,
) -> Result<StatusCode, ApiError> {
    workbench_git::repo::add(&repo(&state, req.path), &req.files).await?;
    Ok(StatusCode::OK)
}

/// POST /git/commit
pub async fn commit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CommitRequest>,
) -> Result<Json<CommitResponse>, ApiError> {
    let hash = workbench_git::repo::commit(
        &repo(&state, req.path),
        &req.message,
        req.author.as_deref(),
        req.email.as_deref(),
    )
    .await?;
    Ok(Json(CommitResponse { hash }))
}

/// POST /git/clone
pub async fn clone(
    State(_state): State<Arc<AppState>>,
    Json(req): Json<CloneRequest>,
) -> Result<StatusCode, ApiError> {
    workbench_git::repo::clone(&req.url, &PathBuf::from(&req.destination), req.branch.as_deref())
        .await?;
    Ok(StatusCode::OK)
}

/// POST /git/pull
pub async fn pull(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RepoQuery>,
) -> Result<StatusCode, ApiError> {
    workbench_git::repo::pull(&repo(&state, req.path)).await?;
    Ok(StatusCode::OK)
}

/// POST /git/push
pub async fn push(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RepoQuery>,
) -> Result<StatusCode, ApiError> {
    workbench_git::repo::push(&repo(&state, req.path)).await?;
    Ok(StatusCode::OK)
}
