// handlers/scoped/mod.rs - Organization-scoped handlers
//
// Every handler here except `organization_show` takes a `TenantScope`
// extractor, so a request without a resolved organization is rejected
// before any store access.

pub mod comments; // /api/tasks/:id/comments
pub mod organization; // GET /api/organization
pub mod projects; // /api/projects, /api/projects/:id, /api/projects/:id/stats
pub mod tasks; // /api/projects/:id/tasks, /api/tasks/:id

pub use comments::{comment_create, comment_list};
pub use organization::organization_show;
pub use projects::{project_create, project_list, project_show, project_stats, project_update};
pub use tasks::{task_create, task_delete, task_list, task_show, task_update};
