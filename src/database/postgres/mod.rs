pub mod query;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::error::StoreError;
use crate::database::models::{
    NewComment, NewOrganization, NewProject, NewTask, Organization, Project, ProjectPatch,
    ProjectSummary, StatusCounts, Task, TaskComment, TaskPatch, TaskStatus,
};
use crate::database::store::{ProjectStore, TenantStore};
use crate::tenant::{ResourceKind, ScopeError, ScopeResult, TenantScope};

pub use query::ScopedQuery;

const PROJECT_SUMMARY_COLUMNS: &str = "r0.*, \
     (SELECT COUNT(*) FROM tasks t WHERE t.project_id = r0.id) AS task_count, \
     (SELECT COUNT(*) FROM tasks t WHERE t.project_id = r0.id AND t.status = 'DONE') AS completed_tasks";

/// Postgres SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// A parent deleted between scope check and write surfaces as a missing parent
fn write_error(err: sqlx::Error, kind: ResourceKind, id: i64) -> ScopeError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
            ScopeError::not_found(kind, id)
        }
        _ => StoreError::from(err).into(),
    }
}

#[derive(FromRow)]
struct StatusCountRow {
    status: TaskStatus,
    n: i64,
}

/// PostgreSQL store over a single connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    async fn fetch_project(&self, scope: &TenantScope, id: i64) -> ScopeResult<Project> {
        ScopedQuery::<Project>::new(ResourceKind::Project, scope)
            .fetch_404(&self.pool, id)
            .await
    }

    async fn fetch_task(&self, scope: &TenantScope, id: i64) -> ScopeResult<Task> {
        ScopedQuery::<Task>::new(ResourceKind::Task, scope)
            .fetch_404(&self.pool, id)
            .await
    }
}

#[async_trait]
impl TenantStore for PgStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, StoreError> {
        let org = sqlx::query_as::<_, Organization>(
            "SELECT id, slug, name, email, created_at FROM organizations WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(org)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, StoreError> {
        let orgs = sqlx::query_as::<_, Organization>(
            "SELECT id, slug, name, email, created_at FROM organizations ORDER BY slug",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(orgs)
    }

    async fn insert_organization(&self, new: NewOrganization) -> Result<Organization, StoreError> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (slug, name, email)
            VALUES ($1, $2, $3)
            RETURNING id, slug, name, email, created_at
            "#,
        )
        .bind(&new.slug)
        .bind(&new.name)
        .bind(&new.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(org)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn list_projects(&self, scope: &TenantScope) -> ScopeResult<Vec<ProjectSummary>> {
        let projects = ScopedQuery::<ProjectSummary>::new(ResourceKind::Project, scope)
            .select(PROJECT_SUMMARY_COLUMNS)
            .order_by("r0.created_at DESC, r0.id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(projects)
    }

    async fn get_project(&self, scope: &TenantScope, id: i64) -> ScopeResult<ProjectSummary> {
        ScopedQuery::<ProjectSummary>::new(ResourceKind::Project, scope)
            .select(PROJECT_SUMMARY_COLUMNS)
            .fetch_404(&self.pool, id)
            .await
    }

    async fn insert_project(
        &self,
        scope: &TenantScope,
        new: NewProject,
    ) -> ScopeResult<ProjectSummary> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (organization_id, name, description, status, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(scope.organization_id())
        .bind(&new.name)
        .bind(new.description.unwrap_or_default())
        .bind(new.status.unwrap_or_default())
        .bind(new.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from)?;

        Ok(ProjectSummary {
            project,
            task_count: 0,
            completed_tasks: 0,
        })
    }

    async fn update_project(
        &self,
        scope: &TenantScope,
        id: i64,
        patch: ProjectPatch,
    ) -> ScopeResult<ProjectSummary> {
        let mut project = self.fetch_project(scope, id).await?;
        patch.apply(&mut project);

        let updated = sqlx::query(
            r#"
            UPDATE projects
            SET name = $3, description = $4, status = $5, due_date = $6
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(project.id)
        .bind(scope.organization_id())
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status)
        .bind(project.due_date)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;

        if updated.rows_affected() == 0 {
            return Err(ScopeError::not_found(ResourceKind::Project, id));
        }
        self.get_project(scope, id).await
    }

    async fn task_status_counts(
        &self,
        scope: &TenantScope,
        project_id: i64,
    ) -> ScopeResult<StatusCounts> {
        let project = self.fetch_project(scope, project_id).await?;

        let rows = sqlx::query_as::<_, StatusCountRow>(
            "SELECT status, COUNT(*) AS n FROM tasks WHERE project_id = $1 GROUP BY status",
        )
        .bind(project.id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from)?;

        let mut counts = StatusCounts::default();
        for row in rows {
            counts.add(row.status, row.n);
        }
        Ok(counts)
    }

    async fn list_tasks(&self, scope: &TenantScope, project_id: i64) -> ScopeResult<Vec<Task>> {
        self.fetch_project(scope, project_id).await?;
        let tasks = ScopedQuery::<Task>::new(ResourceKind::Task, scope)
            .filter("project_id", project_id)
            .order_by("r0.created_at DESC, r0.id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn get_task(&self, scope: &TenantScope, id: i64) -> ScopeResult<Task> {
        self.fetch_task(scope, id).await
    }

    async fn insert_task(
        &self,
        scope: &TenantScope,
        project_id: i64,
        new: NewTask,
    ) -> ScopeResult<Task> {
        // The parent is selected through the organization so a guessed id
        // from another tenant inserts nothing
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, description, status, assignee_email, due_date)
            SELECT p.id, $3, $4, $5, $6, $7
            FROM projects p
            WHERE p.id = $1 AND p.organization_id = $2
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(scope.organization_id())
        .bind(&new.title)
        .bind(new.description.unwrap_or_default())
        .bind(new.status.unwrap_or_default())
        .bind(new.assignee_email.unwrap_or_default())
        .bind(new.due_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, ResourceKind::Project, project_id))?;

        task.ok_or_else(|| ScopeError::not_found(ResourceKind::Project, project_id))
    }

    async fn update_task(&self, scope: &TenantScope, id: i64, patch: TaskPatch) -> ScopeResult<Task> {
        let mut task = self.fetch_task(scope, id).await?;
        patch.apply(&mut task);

        let updated = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks AS t
            SET title = $3, description = $4, status = $5, assignee_email = $6, due_date = $7
            FROM projects p
            WHERE t.id = $1 AND p.id = t.project_id AND p.organization_id = $2
            RETURNING t.*
            "#,
        )
        .bind(task.id)
        .bind(scope.organization_id())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(&task.assignee_email)
        .bind(task.due_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from)?;

        updated.ok_or_else(|| ScopeError::not_found(ResourceKind::Task, id))
    }

    async fn delete_task(&self, scope: &TenantScope, id: i64) -> ScopeResult<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM tasks AS t
            USING projects p
            WHERE t.id = $1 AND p.id = t.project_id AND p.organization_id = $2
            "#,
        )
        .bind(id)
        .bind(scope.organization_id())
        .execute(&self.pool)
        .await
        .map_err(StoreError::from)?;

        if deleted.rows_affected() == 0 {
            return Err(ScopeError::not_found(ResourceKind::Task, id));
        }
        Ok(())
    }

    async fn list_comments(
        &self,
        scope: &TenantScope,
        task_id: i64,
    ) -> ScopeResult<Vec<TaskComment>> {
        self.fetch_task(scope, task_id).await?;
        let comments = ScopedQuery::<TaskComment>::new(ResourceKind::TaskComment, scope)
            .filter("task_id", task_id)
            .order_by("r0.created_at ASC, r0.id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn insert_comment(
        &self,
        scope: &TenantScope,
        task_id: i64,
        new: NewComment,
    ) -> ScopeResult<TaskComment> {
        let comment = sqlx::query_as::<_, TaskComment>(
            r#"
            INSERT INTO task_comments (task_id, content, author_email)
            SELECT t.id, $3, $4
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE t.id = $1 AND p.organization_id = $2
            RETURNING *
            "#,
        )
        .bind(task_id)
        .bind(scope.organization_id())
        .bind(&new.content)
        .bind(&new.author_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, ResourceKind::Task, task_id))?;

        comment.ok_or_else(|| ScopeError::not_found(ResourceKind::Task, task_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_constraint_write_errors_stay_store_errors() {
        let err = write_error(sqlx::Error::PoolTimedOut, ResourceKind::Task, 7);
        assert!(matches!(err, ScopeError::Store(StoreError::Unavailable(_))));
    }
}
