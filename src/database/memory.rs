//! In-process store used by the `memory` backend and by tests.
//!
//! Scoping follows [`ResourceKind::chain`] exactly as the Postgres backend
//! does: a row is visible only if walking its foreign keys ends at the
//! scope's organization.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::error::StoreError;
use crate::database::models::{
    NewComment, NewOrganization, NewProject, NewTask, Organization, Project, ProjectPatch,
    ProjectSummary, StatusCounts, Task, TaskComment, TaskPatch, TaskStatus,
};
use crate::database::store::{ProjectStore, TenantStore};
use crate::tenant::{ResourceKind, ScopeError, ScopeResult, TenantScope};

#[derive(Default)]
struct Tables {
    next_id: i64,
    organizations: BTreeMap<i64, Organization>,
    projects: BTreeMap<i64, Project>,
    tasks: BTreeMap<i64, Task>,
    comments: BTreeMap<i64, TaskComment>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Value of `kind.owner_column()` for row `id`
    fn owner_link(&self, kind: ResourceKind, id: i64) -> Option<i64> {
        match kind {
            ResourceKind::Project => self.projects.get(&id).map(|p| p.organization_id),
            ResourceKind::Task => self.tasks.get(&id).map(|t| t.project_id),
            ResourceKind::TaskComment => self.comments.get(&id).map(|c| c.task_id),
        }
    }

    /// Organization at the end of the ownership chain, if every link exists
    fn organization_of(&self, kind: ResourceKind, id: i64) -> Option<i64> {
        let mut kind = kind;
        let mut id = id;
        loop {
            let owner = self.owner_link(kind, id)?;
            match kind.parent() {
                Some(parent) => {
                    kind = parent;
                    id = owner;
                }
                None => return Some(owner),
            }
        }
    }

    fn check_scope(&self, scope: &TenantScope, kind: ResourceKind, id: i64) -> ScopeResult<()> {
        if self.organization_of(kind, id) == Some(scope.organization_id()) {
            Ok(())
        } else {
            Err(ScopeError::not_found(kind, id))
        }
    }

    fn summarize(&self, project: &Project) -> ProjectSummary {
        let counts = self.status_counts(project.id);
        ProjectSummary {
            project: project.clone(),
            task_count: counts.total(),
            completed_tasks: counts.done,
        }
    }

    fn status_counts(&self, project_id: i64) -> StatusCounts {
        self.tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .map(|t| t.status)
            .collect()
    }
}

pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.organizations.values().find(|o| o.slug == slug).cloned())
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, StoreError> {
        let tables = self.tables.read().await;
        let mut orgs: Vec<Organization> = tables.organizations.values().cloned().collect();
        orgs.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(orgs)
    }

    async fn insert_organization(&self, new: NewOrganization) -> Result<Organization, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.organizations.values().any(|o| o.slug == new.slug) {
            return Err(StoreError::Conflict(format!(
                "organization slug '{}' already exists",
                new.slug
            )));
        }

        let org = Organization {
            id: tables.allocate_id(),
            slug: new.slug,
            name: new.name,
            email: new.email,
            created_at: Utc::now(),
        };
        tables.organizations.insert(org.id, org.clone());
        Ok(org)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list_projects(&self, scope: &TenantScope) -> ScopeResult<Vec<ProjectSummary>> {
        let tables = self.tables.read().await;
        let mut projects: Vec<&Project> = tables
            .projects
            .values()
            .filter(|p| p.organization_id == scope.organization_id())
            .collect();
        projects.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(projects.into_iter().map(|p| tables.summarize(p)).collect())
    }

    async fn get_project(&self, scope: &TenantScope, id: i64) -> ScopeResult<ProjectSummary> {
        let tables = self.tables.read().await;
        tables.check_scope(scope, ResourceKind::Project, id)?;
        let project = tables
            .projects
            .get(&id)
            .ok_or_else(|| ScopeError::not_found(ResourceKind::Project, id))?;
        Ok(tables.summarize(project))
    }

    async fn insert_project(
        &self,
        scope: &TenantScope,
        new: NewProject,
    ) -> ScopeResult<ProjectSummary> {
        let mut tables = self.tables.write().await;
        let project = Project {
            id: tables.allocate_id(),
            organization_id: scope.organization_id(),
            name: new.name,
            description: new.description.unwrap_or_default(),
            status: new.status.unwrap_or_default(),
            due_date: new.due_date,
            created_at: Utc::now(),
        };
        tables.projects.insert(project.id, project.clone());
        Ok(tables.summarize(&project))
    }

    async fn update_project(
        &self,
        scope: &TenantScope,
        id: i64,
        patch: ProjectPatch,
    ) -> ScopeResult<ProjectSummary> {
        let mut tables = self.tables.write().await;
        tables.check_scope(scope, ResourceKind::Project, id)?;
        let project = tables
            .projects
            .get_mut(&id)
            .ok_or_else(|| ScopeError::not_found(ResourceKind::Project, id))?;
        patch.apply(project);
        let project = project.clone();
        Ok(tables.summarize(&project))
    }

    async fn task_status_counts(
        &self,
        scope: &TenantScope,
        project_id: i64,
    ) -> ScopeResult<StatusCounts> {
        let tables = self.tables.read().await;
        tables.check_scope(scope, ResourceKind::Project, project_id)?;
        Ok(tables.status_counts(project_id))
    }

    async fn list_tasks(&self, scope: &TenantScope, project_id: i64) -> ScopeResult<Vec<Task>> {
        let tables = self.tables.read().await;
        tables.check_scope(scope, ResourceKind::Project, project_id)?;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(tasks)
    }

    async fn get_task(&self, scope: &TenantScope, id: i64) -> ScopeResult<Task> {
        let tables = self.tables.read().await;
        tables.check_scope(scope, ResourceKind::Task, id)?;
        tables
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| ScopeError::not_found(ResourceKind::Task, id))
    }

    async fn insert_task(
        &self,
        scope: &TenantScope,
        project_id: i64,
        new: NewTask,
    ) -> ScopeResult<Task> {
        let mut tables = self.tables.write().await;
        tables.check_scope(scope, ResourceKind::Project, project_id)?;
        let task = Task {
            id: tables.allocate_id(),
            project_id,
            title: new.title,
            description: new.description.unwrap_or_default(),
            status: new.status.unwrap_or(TaskStatus::Todo),
            assignee_email: new.assignee_email.unwrap_or_default(),
            due_date: new.due_date,
            created_at: Utc::now(),
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, scope: &TenantScope, id: i64, patch: TaskPatch) -> ScopeResult<Task> {
        let mut tables = self.tables.write().await;
        tables.check_scope(scope, ResourceKind::Task, id)?;
        let task = tables
            .tasks
            .get_mut(&id)
            .ok_or_else(|| ScopeError::not_found(ResourceKind::Task, id))?;
        patch.apply(task);
        Ok(task.clone())
    }

    async fn delete_task(&self, scope: &TenantScope, id: i64) -> ScopeResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_scope(scope, ResourceKind::Task, id)?;
        tables.tasks.remove(&id);
        tables.comments.retain(|_, c| c.task_id != id);
        Ok(())
    }

    async fn list_comments(
        &self,
        scope: &TenantScope,
        task_id: i64,
    ) -> ScopeResult<Vec<TaskComment>> {
        let tables = self.tables.read().await;
        tables.check_scope(scope, ResourceKind::Task, task_id)?;
        let mut comments: Vec<TaskComment> = tables
            .comments
            .values()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(comments)
    }

    async fn insert_comment(
        &self,
        scope: &TenantScope,
        task_id: i64,
        new: NewComment,
    ) -> ScopeResult<TaskComment> {
        let mut tables = self.tables.write().await;
        tables.check_scope(scope, ResourceKind::Task, task_id)?;
        let comment = TaskComment {
            id: tables.allocate_id(),
            task_id,
            content: new.content,
            author_email: new.author_email,
            created_at: Utc::now(),
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }
}
