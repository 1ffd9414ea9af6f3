mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn project_create_applies_defaults() -> Result<()> {
    let app = common::seeded_app().await;

    let (status, body) = app
        .post("/api/projects", "acme", json!({ "name": "  Rocket Skates  " }))
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let project = &body["data"];
    assert_eq!(project["name"], "Rocket Skates");
    assert_eq!(project["status"], "ACTIVE");
    assert_eq!(project["description"], "");
    assert_eq!(project["task_count"], 0);
    assert_eq!(project["completed_tasks"], 0);
    assert!(project.get("organization_id").is_none());
    Ok(())
}

#[tokio::test]
async fn blank_project_name_is_rejected() -> Result<()> {
    let app = common::seeded_app().await;

    let (status, body) = app.post("/api/projects", "acme", json!({ "name": "   " })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["name"].is_string());
    Ok(())
}

#[tokio::test]
async fn project_update_changes_only_given_fields() -> Result<()> {
    let app = common::seeded_app().await;
    let id = app.create_project("acme", "Rocket Skates").await?;

    let (status, body) = app
        .patch(
            &format!("/api/projects/{}", id),
            "acme",
            json!({ "status": "ON_HOLD", "due_date": "2026-12-31" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Rocket Skates");
    assert_eq!(body["data"]["status"], "ON_HOLD");
    assert_eq!(body["data"]["due_date"], "2026-12-31");
    Ok(())
}

#[tokio::test]
async fn stats_count_tasks_by_status() -> Result<()> {
    let app = common::seeded_app().await;
    let id = app.create_project("acme", "Rocket Skates").await?;
    app.create_task("acme", id, "Design", "TODO").await?;
    app.create_task("acme", id, "Source parts", "TODO").await?;
    app.create_task("acme", id, "Assemble", "IN_PROGRESS").await?;
    app.create_task("acme", id, "Order rockets", "DONE").await?;

    let (status, body) = app.get(&format!("/api/projects/{}/stats", id), Some("acme")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({ "total": 4, "todo": 2, "in_progress": 1, "done": 1, "completion_rate": 25.0 })
    );

    let (_, body) = app.get(&format!("/api/projects/{}", id), Some("acme")).await?;
    assert_eq!(body["data"]["task_count"], 4);
    assert_eq!(body["data"]["completed_tasks"], 1);
    Ok(())
}

#[tokio::test]
async fn stats_for_empty_project() -> Result<()> {
    let app = common::seeded_app().await;
    let id = app.create_project("acme", "Rocket Skates").await?;

    let (_, body) = app.get(&format!("/api/projects/{}/stats", id), Some("acme")).await?;
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["completion_rate"], 0.0);
    Ok(())
}

#[tokio::test]
async fn task_lifecycle() -> Result<()> {
    let app = common::seeded_app().await;
    let project = app.create_project("acme", "Rocket Skates").await?;

    let (status, body) = app
        .post(
            &format!("/api/projects/{}/tasks", project),
            "acme",
            json!({
                "title": "Order rockets",
                "assignee_email": "wile@acme.example",
                "due_date": "2026-11-01T09:00:00Z"
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "TODO");
    assert_eq!(body["data"]["project_id"], project);
    let task = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/tasks/{}", task);

    let (status, body) = app.patch(&uri, "acme", json!({ "status": "DONE" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "DONE");
    assert_eq!(body["data"]["assignee_email"], "wile@acme.example");

    let (_, stats) = app.get(&format!("/api/projects/{}/stats", project), Some("acme")).await?;
    assert_eq!(stats["data"]["completion_rate"], 100.0);

    let (status, body) = app.delete(&uri, "acme").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "ok": true, "deleted_id": task }));

    let (status, _) = app.get(&uri, Some("acme")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&uri, "acme").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn task_validation() -> Result<()> {
    let app = common::seeded_app().await;
    let project = app.create_project("acme", "Rocket Skates").await?;
    let uri = format!("/api/projects/{}/tasks", project);

    let (status, body) = app.post(&uri, "acme", json!({ "title": "" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["title"].is_string());

    let (status, body) = app
        .post(&uri, "acme", json!({ "title": "Design", "assignee_email": "not-an-email" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["assignee_email"].is_string());
    Ok(())
}

#[tokio::test]
async fn comments_list_in_posting_order() -> Result<()> {
    let app = common::seeded_app().await;
    let project = app.create_project("acme", "Rocket Skates").await?;
    let task = app.create_task("acme", project, "Order rockets", "TODO").await?;
    let uri = format!("/api/tasks/{}/comments", task);

    for content in ["first", "second"] {
        let (status, _) = app
            .post(&uri, "acme", json!({ "content": content, "author_email": "wile@acme.example" }))
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = app.get(&uri, Some("acme")).await?;
    let contents: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["first", "second"]);

    let (status, body) = app
        .post(&uri, "acme", json!({ "content": "third", "author_email": "nobody" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["author_email"].is_string());
    Ok(())
}

#[tokio::test]
async fn deleting_task_removes_its_comments() -> Result<()> {
    let app = common::seeded_app().await;
    let project = app.create_project("acme", "Rocket Skates").await?;
    let task = app.create_task("acme", project, "Order rockets", "TODO").await?;

    app.post(
        &format!("/api/tasks/{}/comments", task),
        "acme",
        json!({ "content": "note", "author_email": "wile@acme.example" }),
    )
    .await?;
    app.delete(&format!("/api/tasks/{}", task), "acme").await?;

    let (status, _) = app.get(&format!("/api/tasks/{}/comments", task), Some("acme")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
