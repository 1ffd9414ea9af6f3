mod common;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Serve the seeded router on a free local port
async fn spawn_server() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let app = common::seeded_app().await;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app.router).await {
            eprintln!("test server stopped: {}", e);
        }
    });

    let base_url = format!("http://127.0.0.1:{}", port);
    wait_ready(&base_url, Duration::from_secs(5)).await?;
    Ok(base_url)
}

async fn wait_ready(base_url: &str, timeout: Duration) -> Result<()> {
    let client = reqwest::Client::new();
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if let Ok(resp) = client.get(format!("{}/health", base_url)).send().await {
            if resp.status() == StatusCode::OK {
                return Ok(());
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("server did not become ready on {} within {:?}", base_url, timeout)
}

#[tokio::test]
async fn header_scopes_requests_over_http() -> Result<()> {
    let base_url = spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/projects", base_url))
        .header("X-Org-Slug", "acme")
        .json(&json!({ "name": "Rocket Skates" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    let id = created["data"]["id"].as_i64().context("project id missing")?;

    let res = client
        .get(format!("{}/api/projects/{}", base_url, id))
        .header("X-Org-Slug", "globex")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/api/projects", base_url))
        .header("X-Org-Slug", "initech")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Invalid organization.");
    Ok(())
}

#[tokio::test]
async fn cors_preflight_allows_org_header() -> Result<()> {
    let base_url = spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .request(reqwest::Method::OPTIONS, format!("{}/api/projects", base_url))
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "x-org-slug")
        .send()
        .await?;

    assert!(res.status().is_success(), "preflight status {}", res.status());
    let allow_origin = res
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok());
    assert_eq!(allow_origin, Some("*"));

    let allow_headers = res
        .headers()
        .get("access-control-allow-headers")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    assert!(allow_headers.contains("x-org-slug"), "{}", allow_headers);
    Ok(())
}
