// handlers/scoped/projects.rs - Project handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::{NewProject, ProjectPatch, ProjectStats, ProjectSummary};
use crate::middleware::{ApiResponse, ApiResult};
use crate::tenant::TenantScope;

/// GET /api/projects
pub async fn project_list(
    State(state): State<AppState>,
    scope: TenantScope,
) -> ApiResult<Vec<ProjectSummary>> {
    let projects = state.projects.list_projects(&scope).await?;
    Ok(ApiResponse::success(projects))
}

/// POST /api/projects
pub async fn project_create(
    State(state): State<AppState>,
    scope: TenantScope,
    Json(new): Json<NewProject>,
) -> ApiResult<ProjectSummary> {
    let project = state.projects.create_project(&scope, new).await?;
    Ok(ApiResponse::created(project))
}

/// GET /api/projects/:id
pub async fn project_show(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> ApiResult<ProjectSummary> {
    let project = state.projects.get_project(&scope, id).await?;
    Ok(ApiResponse::success(project))
}

/// PATCH /api/projects/:id
pub async fn project_update(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<i64>,
    Json(patch): Json<ProjectPatch>,
) -> ApiResult<ProjectSummary> {
    let project = state.projects.update_project(&scope, id, patch).await?;
    Ok(ApiResponse::success(project))
}

/// GET /api/projects/:id/stats
pub async fn project_stats(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> ApiResult<ProjectStats> {
    let stats = state.projects.project_stats(&scope, id).await?;
    Ok(ApiResponse::success(stats))
}
