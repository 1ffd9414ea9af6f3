// handlers/public/root.rs - GET / handler

use axum::response::Json;
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Mini PM API",
            "version": version,
            "description": "Multi-tenant project management API (organization scoped by X-Org-Slug)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "organization": "/api/organization",
                "projects": "/api/projects[/:id] (organization required)",
                "stats": "/api/projects/:id/stats (organization required)",
                "tasks": "/api/projects/:id/tasks, /api/tasks/:id (organization required)",
                "comments": "/api/tasks/:id/comments (organization required)",
            }
        }
    }))
}
