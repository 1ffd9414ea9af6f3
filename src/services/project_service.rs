use std::sync::Arc;
use tracing::info;

use crate::database::models::{
    NewComment, NewProject, NewTask, ProjectPatch, ProjectStats, ProjectSummary, Task, TaskComment,
    TaskPatch,
};
use crate::database::store::ProjectStore;
use crate::tenant::{ScopeError, ScopeResult, TenantScope};

/// Scoped operations on projects, tasks and comments.
///
/// Every method takes the [`TenantScope`] issued by the require-tenant guard
/// and hands it to the store, which filters by the ownership chain. This
/// layer validates input and applies defaults.
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    pub async fn list_projects(&self, scope: &TenantScope) -> ScopeResult<Vec<ProjectSummary>> {
        self.store.list_projects(scope).await
    }

    pub async fn get_project(&self, scope: &TenantScope, id: i64) -> ScopeResult<ProjectSummary> {
        self.store.get_project(scope, id).await
    }

    pub async fn create_project(
        &self,
        scope: &TenantScope,
        new: NewProject,
    ) -> ScopeResult<ProjectSummary> {
        let new = NewProject {
            name: required_text("name", &new.name)?,
            description: Some(new.description.unwrap_or_default()),
            status: Some(new.status.unwrap_or_default()),
            due_date: new.due_date,
        };

        let project = self.store.insert_project(scope, new).await?;
        info!("Project {} created in organization '{}'", project.project.id, scope.slug());
        Ok(project)
    }

    pub async fn update_project(
        &self,
        scope: &TenantScope,
        id: i64,
        mut patch: ProjectPatch,
    ) -> ScopeResult<ProjectSummary> {
        if let Some(name) = patch.name.as_deref() {
            patch.name = Some(required_text("name", name)?);
        }

        let project = self.store.update_project(scope, id, patch).await?;
        info!("Project {} updated in organization '{}'", id, scope.slug());
        Ok(project)
    }

    pub async fn project_stats(&self, scope: &TenantScope, project_id: i64) -> ScopeResult<ProjectStats> {
        let counts = self.store.task_status_counts(scope, project_id).await?;
        Ok(ProjectStats::from(counts))
    }

    pub async fn list_tasks(&self, scope: &TenantScope, project_id: i64) -> ScopeResult<Vec<Task>> {
        self.store.list_tasks(scope, project_id).await
    }

    pub async fn get_task(&self, scope: &TenantScope, id: i64) -> ScopeResult<Task> {
        self.store.get_task(scope, id).await
    }

    pub async fn create_task(
        &self,
        scope: &TenantScope,
        project_id: i64,
        new: NewTask,
    ) -> ScopeResult<Task> {
        let assignee_email = new.assignee_email.unwrap_or_default();
        optional_email("assignee_email", &assignee_email)?;

        let new = NewTask {
            title: required_text("title", &new.title)?,
            description: Some(new.description.unwrap_or_default()),
            status: Some(new.status.unwrap_or_default()),
            assignee_email: Some(assignee_email.trim().to_string()),
            due_date: new.due_date,
        };

        let task = self.store.insert_task(scope, project_id, new).await?;
        info!(
            "Task {} created in project {} for organization '{}'",
            task.id,
            project_id,
            scope.slug()
        );
        Ok(task)
    }

    pub async fn update_task(
        &self,
        scope: &TenantScope,
        id: i64,
        mut patch: TaskPatch,
    ) -> ScopeResult<Task> {
        if let Some(title) = patch.title.as_deref() {
            patch.title = Some(required_text("title", title)?);
        }
        if let Some(email) = patch.assignee_email.as_deref() {
            optional_email("assignee_email", email)?;
            patch.assignee_email = Some(email.trim().to_string());
        }

        let task = self.store.update_task(scope, id, patch).await?;
        info!("Task {} updated in organization '{}'", id, scope.slug());
        Ok(task)
    }

    pub async fn delete_task(&self, scope: &TenantScope, id: i64) -> ScopeResult<()> {
        self.store.delete_task(scope, id).await?;
        info!("Task {} deleted in organization '{}'", id, scope.slug());
        Ok(())
    }

    pub async fn list_comments(&self, scope: &TenantScope, task_id: i64) -> ScopeResult<Vec<TaskComment>> {
        self.store.list_comments(scope, task_id).await
    }

    pub async fn add_comment(
        &self,
        scope: &TenantScope,
        task_id: i64,
        new: NewComment,
    ) -> ScopeResult<TaskComment> {
        let author_email = required_text("author_email", &new.author_email)?;
        if !looks_like_email(&author_email) {
            return Err(ScopeError::validation("author_email", "author_email must be an email address"));
        }

        let new = NewComment {
            content: required_text("content", &new.content)?,
            author_email,
        };

        let comment = self.store.insert_comment(scope, task_id, new).await?;
        info!(
            "Comment {} added to task {} in organization '{}'",
            comment.id,
            task_id,
            scope.slug()
        );
        Ok(comment)
    }
}

fn required_text(field: &'static str, value: &str) -> ScopeResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ScopeError::validation(field, format!("{} must not be blank", field)));
    }
    Ok(trimmed.to_string())
}

fn optional_email(field: &'static str, value: &str) -> ScopeResult<()> {
    let value = value.trim();
    if value.is_empty() || looks_like_email(value) {
        Ok(())
    } else {
        Err(ScopeError::validation(field, format!("{} must be an email address", field)))
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
