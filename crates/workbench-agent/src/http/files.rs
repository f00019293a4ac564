//! Handlers for /files — thin file-system delegations.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use workbench_fs::{FileInfo, FileMatch, ReplaceResult};

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    /// Defaults to the project directory where that makes sense.
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub path: String,
    #[serde(default)]
    pub recursive: bool,
}

#[derive(Debug, Deserialize)]
pub struct PatternQuery {
    pub path: Option<String>,
    pub pattern: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRequest {
    pub path: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_mode() -> String {
    "755".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsRequest {
    pub path: String,
    pub mode: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceRequest {
    pub files: Vec<String>,
    pub pattern: String,
    pub new_value: String,
}

fn resolve(state: &AppState, path: Option<String>) -> PathBuf {
    path.map(PathBuf::from).unwrap_or_else(|| state.project_dir())
}

/// GET /files
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Json<Vec<FileInfo>>, ApiError> {
    let entries = workbench_fs::ops::list_dir(&resolve(&state, query.path)).await?;
    Ok(Json(entries))
}

/// GET /files/info
pub async fn info(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Json<FileInfo>, ApiError> {
    let info = workbench_fs::ops::info(&resolve(&state, query.path)).await?;
    Ok(Json(info))
}

/// GET /files/download — raw file bytes.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Vec<u8>, ApiError> {
    let bytes = workbench_fs::ops::read_file(&resolve(&state, query.path)).await?;
    Ok(bytes)
}

/// POST /files/upload
pub async fn upload(
    State(_state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> Result<StatusCode, ApiError> {
    workbench_fs::ops::write_file(&PathBuf::from(&req.path), req.content.as_bytes()).await?;
    Ok(StatusCode::OK)
}

/// POST /files/folder
pub async fn create_folder(
    State(_state): State<Arc<AppState>>,
    Json(req): Json<FolderRequest>,
) -> Result<StatusCode, ApiError> {
    workbench_fs::ops::create_folder(&PathBuf::from(&req.path), &req.mode).await?;
    Ok(StatusCode::OK)
}

/// POST /files/move
pub async fn move_entry(
    State(_state): State<Arc<AppState>>,
    Json(req): Json<MoveRequest>,
) -> Result<StatusCode, ApiError> {
    workbench_fs::ops::move_entry(&PathBuf::from(&req.source), &PathBuf::from(&req.destination))
        .await?;
    Ok(StatusCode::OK)
}

/// POST /files/permissions
pub async fn permissions(
    State(_state): State<Arc<AppState>>,
    Json(req): Json<PermissionsRequest>,
) -> Result<StatusCode, ApiError> {
    workbench_fs::ops::set_permissions(&PathBuf::from(&req.path), &req.mode).await?;
    Ok(StatusCode::OK)
}

/// DELETE /files
pub async fn delete_entry(
    State(_state): State<Arc<AppState>>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    workbench_fs::ops::delete(&PathBuf::from(&query.path), query.recursive).await?;
    Ok(StatusCode::OK)
}

/// GET /files/search — file names containing the pattern.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PatternQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let hits = workbench_fs::search::search_names(&resolve(&state, query.path), &query.pattern)
        .await?
        .into_iter()
        .map(|p| p.display().to_string())
        .collect();
    Ok(Json(hits))
}

/// GET /files/find — lines containing the pattern.
pub async fn find(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PatternQuery>,
) -> Result<Json<Vec<FileMatch>>, ApiError> {
    let hits =
        workbench_fs::search::find_in_files(&resolve(&state, query.path), &query.pattern).await?;
    Ok(Json(hits))
}

/// POST /files/replace
pub async fn replace(
    State(_state): State<Arc<AppState>>,
    Json(req): Json<ReplaceRequest>,
) -> Result<Json<Vec<ReplaceResult>>, ApiError> {
    let files: Vec<PathBuf> = req.files.iter().map(PathBuf::from).collect();
    let results = workbench_fs::search::replace_in_files(&files, &req.pattern, &req.new_value).await;
    Ok(Json(results))
}
