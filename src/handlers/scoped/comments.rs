// handlers/scoped/comments.rs - Task comment handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::{NewComment, TaskComment};
use crate::middleware::{ApiResponse, ApiResult};
use crate::tenant::TenantScope;

/// GET /api/tasks/:id/comments
pub async fn comment_list(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(task_id): Path<i64>,
) -> ApiResult<Vec<TaskComment>> {
    let comments = state.projects.list_comments(&scope, task_id).await?;
    Ok(ApiResponse::success(comments))
}

/// POST /api/tasks/:id/comments
pub async fn comment_create(
    State(state): State<AppState>,
    scope: TenantScope,
    Path(task_id): Path<i64>,
    Json(new): Json<NewComment>,
) -> ApiResult<TaskComment> {
    let comment = state.projects.add_comment(&scope, task_id, new).await?;
    Ok(ApiResponse::created(comment))
}
