mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn projects_are_listed_per_organization() -> Result<()> {
    let app = common::seeded_app().await;
    app.create_project("acme", "Rocket Skates").await?;
    app.create_project("globex", "Doomsday Device").await?;

    let (_, acme) = app.get("/api/projects", Some("acme")).await?;
    let (_, globex) = app.get("/api/projects", Some("globex")).await?;

    let names = |body: &serde_json::Value| -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(names(&acme), vec!["Rocket Skates"]);
    assert_eq!(names(&globex), vec!["Doomsday Device"]);
    Ok(())
}

#[tokio::test]
async fn foreign_project_looks_missing() -> Result<()> {
    let app = common::seeded_app().await;
    let id = app.create_project("acme", "Rocket Skates").await?;

    let (status, foreign) = app.get(&format!("/api/projects/{}", id), Some("globex")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, missing) = app.get("/api/projects/999999", Some("globex")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(foreign["code"], missing["code"]);
    assert_eq!(foreign["message"], format!("Project {} not found", id));

    let (status, _) = app.get(&format!("/api/projects/{}/stats", id), Some("globex")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn foreign_project_cannot_be_updated() -> Result<()> {
    let app = common::seeded_app().await;
    let id = app.create_project("acme", "Rocket Skates").await?;

    let (status, _) = app
        .patch(&format!("/api/projects/{}", id), "globex", json!({ "name": "Stolen" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get(&format!("/api/projects/{}", id), Some("acme")).await?;
    assert_eq!(body["data"]["name"], "Rocket Skates");
    Ok(())
}

#[tokio::test]
async fn tasks_cannot_be_created_under_foreign_project() -> Result<()> {
    let app = common::seeded_app().await;
    let id = app.create_project("acme", "Rocket Skates").await?;

    let (status, _) = app
        .post(&format!("/api/projects/{}/tasks", id), "globex", json!({ "title": "Sabotage" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&format!("/api/projects/{}/tasks", id), Some("globex")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get(&format!("/api/projects/{}/tasks", id), Some("acme")).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn foreign_task_is_untouchable() -> Result<()> {
    let app = common::seeded_app().await;
    let project = app.create_project("acme", "Rocket Skates").await?;
    let task = app.create_task("acme", project, "Order rockets", "TODO").await?;
    let uri = format!("/api/tasks/{}", task);

    let (status, _) = app.get(&uri, Some("globex")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.patch(&uri, "globex", json!({ "status": "DONE" })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&uri, "globex").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get(&uri, Some("acme")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "TODO");
    Ok(())
}

#[tokio::test]
async fn foreign_task_comments_are_hidden() -> Result<()> {
    let app = common::seeded_app().await;
    let project = app.create_project("acme", "Rocket Skates").await?;
    let task = app.create_task("acme", project, "Order rockets", "TODO").await?;
    let uri = format!("/api/tasks/{}/comments", task);

    let (status, _) = app
        .post(&uri, "acme", json!({ "content": "Ordered", "author_email": "wile@acme.example" }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.get(&uri, Some("globex")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(&uri, "globex", json!({ "content": "Spam", "author_email": "spy@globex.example" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get(&uri, Some("acme")).await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn concurrent_requests_keep_their_own_organization() -> Result<()> {
    let app = common::seeded_app().await;
    app.create_project("acme", "Rocket Skates").await?;
    app.create_project("globex", "Doomsday Device").await?;

    let requests = (0..32).map(|i| {
        let org = if i % 2 == 0 { "acme" } else { "globex" };
        let app = &app;
        async move { (org, app.get("/api/projects", Some(org)).await) }
    });

    for (org, result) in futures::future::join_all(requests).await {
        let (status, body) = result?;
        assert_eq!(status, StatusCode::OK);

        let projects = body["data"].as_array().unwrap();
        assert_eq!(projects.len(), 1);
        let expected = if org == "acme" { "Rocket Skates" } else { "Doomsday Device" };
        assert_eq!(projects[0]["name"], expected);
    }
    Ok(())
}
