use async_trait::async_trait;

use crate::database::error::StoreError;
use crate::database::models::{
    NewComment, NewOrganization, NewProject, NewTask, Organization, ProjectPatch, ProjectSummary,
    StatusCounts, Task, TaskComment, TaskPatch,
};
use crate::tenant::{ScopeResult, TenantScope};

/// Organization registry. Lookups here are the only unscoped reads.
#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, StoreError>;

    async fn list_organizations(&self) -> Result<Vec<Organization>, StoreError>;

    /// Fails with `StoreError::Conflict` when the slug is taken
    async fn insert_organization(&self, new: NewOrganization) -> Result<Organization, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Tenant-owned data. Every method takes the scope produced by the
/// require-tenant guard and must filter by its ownership chain; a row
/// outside the scope is reported as `ResourceNotFound`.
///
/// Inputs arrive validated with defaults applied by `ProjectService`.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Newest first
    async fn list_projects(&self, scope: &TenantScope) -> ScopeResult<Vec<ProjectSummary>>;

    async fn get_project(&self, scope: &TenantScope, id: i64) -> ScopeResult<ProjectSummary>;

    async fn insert_project(&self, scope: &TenantScope, new: NewProject)
        -> ScopeResult<ProjectSummary>;

    async fn update_project(
        &self,
        scope: &TenantScope,
        id: i64,
        patch: ProjectPatch,
    ) -> ScopeResult<ProjectSummary>;

    async fn task_status_counts(&self, scope: &TenantScope, project_id: i64)
        -> ScopeResult<StatusCounts>;

    /// Newest first
    async fn list_tasks(&self, scope: &TenantScope, project_id: i64) -> ScopeResult<Vec<Task>>;

    async fn get_task(&self, scope: &TenantScope, id: i64) -> ScopeResult<Task>;

    async fn insert_task(&self, scope: &TenantScope, project_id: i64, new: NewTask)
        -> ScopeResult<Task>;

    async fn update_task(&self, scope: &TenantScope, id: i64, patch: TaskPatch) -> ScopeResult<Task>;

    async fn delete_task(&self, scope: &TenantScope, id: i64) -> ScopeResult<()>;

    /// Oldest first
    async fn list_comments(&self, scope: &TenantScope, task_id: i64)
        -> ScopeResult<Vec<TaskComment>>;

    async fn insert_comment(
        &self,
        scope: &TenantScope,
        task_id: i64,
        new: NewComment,
    ) -> ScopeResult<TaskComment>;
}
