#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use mini_pm_api::config::{AppConfig, StoreBackend};
use mini_pm_api::database::MemoryStore;
use mini_pm_api::services::{seed_pairs, OrganizationService};
use mini_pm_api::{build_router, AppState};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.store.backend = StoreBackend::Memory;
    config
}

/// Router over a fresh in-memory store holding `acme` and `globex`
pub async fn seeded_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    OrganizationService::new(store.clone())
        .ensure(&seed_pairs(&["acme", "globex"]))
        .await
        .expect("failed to seed organizations");

    let state = AppState::new(store.clone(), store.clone());
    TestApp {
        router: build_router(state, &test_config()),
        store,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        org: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(slug) = org {
            builder = builder.header("x-org-slug", slug);
        }

        let request = match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&value)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };
        Ok((status, json))
    }

    pub async fn get(&self, uri: &str, org: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, org, None).await
    }

    pub async fn post(&self, uri: &str, org: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(org), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, org: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PATCH, uri, Some(org), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, org: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, Some(org), None).await
    }

    pub async fn create_project(&self, org: &str, name: &str) -> Result<i64> {
        let (status, body) = self
            .post("/api/projects", org, json!({ "name": name }))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create project failed: {} {}", status, body);
        body["data"]["id"].as_i64().context("project id missing")
    }

    pub async fn create_task(&self, org: &str, project_id: i64, title: &str, status: &str) -> Result<i64> {
        let (code, body) = self
            .post(
                &format!("/api/projects/{}/tasks", project_id),
                org,
                json!({ "title": title, "status": status }),
            )
            .await?;
        anyhow::ensure!(code == StatusCode::CREATED, "create task failed: {} {}", code, body);
        body["data"]["id"].as_i64().context("task id missing")
    }
}
