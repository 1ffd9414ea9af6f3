// handlers/scoped/tasks.rs - Task handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::{NewTask, Task, TaskPatch};
use crate::middleware::{ApiResponse, ApiResult};
use crate::tenant::TenantScope;

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub ok: bool,
    pub deleted_id: i64,
}

/// GET /api/projects/:id/tasks
pub async fn task_list(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(project_id): Path<i64>,
) -> ApiResult<Vec<Task>> {
    let tasks = state.projects.list_tasks(&scope, project_id).await?;
    Ok(ApiResponse::success(tasks))
}

/// POST /api/projects/:id/tasks
pub async fn task_create(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(project_id): Path<i64>,
    Json(new): Json<NewTask>,
) -> ApiResult<Task> {
    let task = state.projects.create_task(&scope, project_id, new).await?;
    Ok(ApiResponse::created(task))
}

/// GET /api/tasks/:id
pub async fn task_show(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> ApiResult<Task> {
    let task = state.projects.get_task(&scope, id).await?;
    Ok(ApiResponse::success(task))
}

/// PATCH /api/tasks/:id
pub async fn task_update(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Task> {
    let task = state.projects.update_task(&scope, id, patch).await?;
    Ok(ApiResponse::success(task))
}

/// DELETE /api/tasks/:id
pub async fn task_delete(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(id): Path<i64>,
) -> ApiResult<Deleted> {
    state.projects.delete_task(&scope, id).await?;
    Ok(ApiResponse::success(Deleted {
        ok: true,
        deleted_id: id,
    }))
}
