mod common;

use std::collections::HashSet;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_task_lifecycle() {
    let app = TestApp::new();

    let signed_up = app.sign_up("Ada", "ada@example.com").await;
    assert_eq!(signed_up.status, StatusCode::CREATED);
    let login = app.login("ada@example.com", common::PASSWORD).await;
    assert_eq!(login.status, StatusCode::OK);
    let token = login.body["accessToken"].as_str().unwrap().to_string();

    let created = app
        .post("/api/tasks", Some(&token), json!({ "title": "Ship" }))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let task = &created.body["task"];
    assert_eq!(task["title"], "Ship");
    assert_eq!(task["status"], "todo");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["user"], signed_up.body["user"]["id"]);
    assert!(task["completedAt"].is_null());
    let id = task["id"].as_str().unwrap().to_string();
    let uri = format!("/api/tasks/{id}");

    let completed = app
        .patch(&uri, &token, json!({ "status": "completed" }))
        .await;
    assert_eq!(completed.status, StatusCode::OK);
    let completed_at = completed.body["task"]["completedAt"].clone();
    assert!(completed_at.is_string());

    let resaved = app
        .patch(&uri, &token, json!({ "status": "completed", "title": "Shipped" }))
        .await;
    assert_eq!(resaved.body["task"]["completedAt"], completed_at);

    let reopened = app
        .patch(&uri, &token, json!({ "status": "in-progress" }))
        .await;
    assert!(reopened.body["task"]["completedAt"].is_null());

    let deleted = app.delete(&uri, &token).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app.get(&uri, &token).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.detail(), "No task found with that ID.");
}

#[tokio::test]
async fn test_tasks_require_login() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/api/tasks", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_other_users_tasks_are_invisible() {
    let app = TestApp::new();
    let alice = app.user_token("Alice", "alice@example.com").await;
    let bob = app.user_token("Bob", "bob@example.com").await;

    let created = app
        .post("/api/tasks", Some(&alice), json!({ "title": "Private" }))
        .await;
    let uri = format!("/api/tasks/{}", created.body["task"]["id"].as_str().unwrap());

    assert_eq!(app.get(&uri, &bob).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.patch(&uri, &bob, json!({ "title": "Mine now" })).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.delete(&uri, &bob).await.status, StatusCode::NOT_FOUND);

    let listed = app.get("/api/tasks", &bob).await;
    assert_eq!(listed.body["total"], 0);

    let still_there = app.get(&uri, &alice).await;
    assert_eq!(still_there.status, StatusCode::OK);
    assert_eq!(still_there.body["task"]["title"], "Private");
}

#[tokio::test]
async fn test_malformed_task_id() {
    let app = TestApp::new();
    let token = app.user_token("Ada", "ada@example.com").await;

    let response = app.get("/api/tasks/not-a-uuid", &token).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.detail(), "Invalid task ID");
}

#[tokio::test]
async fn test_create_validation() {
    let app = TestApp::new();
    let token = app.user_token("Ada", "ada@example.com").await;

    let missing_title = app.post("/api/tasks", Some(&token), json!({})).await;
    assert_eq!(missing_title.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_title.detail(), "Task title is required");

    let long_title = app
        .post("/api/tasks", Some(&token), json!({ "title": "x".repeat(101) }))
        .await;
    assert_eq!(long_title.status, StatusCode::BAD_REQUEST);

    let bad_status = app
        .post(
            "/api/tasks",
            Some(&token),
            json!({ "title": "Ship", "status": "done" }),
        )
        .await;
    assert_eq!(bad_status.status, StatusCode::BAD_REQUEST);

    let empty_patch_target = app
        .post("/api/tasks", Some(&token), json!({ "title": "Ship" }))
        .await;
    let uri = format!(
        "/api/tasks/{}",
        empty_patch_target.body["task"]["id"].as_str().unwrap()
    );
    let empty = app.patch(&uri, &token, json!({})).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.detail(), "No valid fields provided for update.");
}

#[tokio::test]
async fn test_pagination_covers_every_task_once() {
    let app = TestApp::new();
    let token = app.user_token("Ada", "ada@example.com").await;

    for i in 0..12 {
        let response = app
            .post("/api/tasks", Some(&token), json!({ "title": format!("Task {i}") }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let mut seen = HashSet::new();
    for page in 1..=3 {
        let response = app
            .get(&format!("/api/tasks?limit=5&page={page}&sortBy=title&order=asc"), &token)
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["total"], 12);
        assert_eq!(response.body["pages"], 3);
        assert_eq!(response.body["page"], page);
        for task in response.body["tasks"].as_array().unwrap() {
            assert!(seen.insert(task["id"].as_str().unwrap().to_string()));
        }
    }
    assert_eq!(seen.len(), 12);

    let clamped = app.get("/api/tasks?limit=1000&page=0", &token).await;
    assert_eq!(clamped.body["page"], 1);
    assert_eq!(clamped.body["tasks"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_filters_and_search() {
    let app = TestApp::new();
    let token = app.user_token("Ada", "ada@example.com").await;

    for body in [
        json!({ "title": "Write report", "priority": "high", "tags": ["work"] }),
        json!({ "title": "Buy milk", "priority": "low", "tags": ["home"], "dueDate": "2020-01-01" }),
        json!({ "title": "Review report draft", "status": "in-progress", "tags": ["work", "urgent"] }),
    ] {
        let response = app.post("/api/tasks", Some(&token), body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    }

    let work = app.get("/api/tasks?tags=work", &token).await;
    assert_eq!(work.body["total"], 2);

    let high = app.get("/api/tasks?priority=high", &token).await;
    assert_eq!(high.body["total"], 1);
    assert_eq!(high.body["tasks"][0]["title"], "Write report");

    let in_progress = app.get("/api/tasks?status=in-progress", &token).await;
    assert_eq!(in_progress.body["total"], 1);

    let search = app.get("/api/tasks?search=report", &token).await;
    assert_eq!(search.body["total"], 2);

    let due = app.get("/api/tasks?dueBefore=2021-01-01", &token).await;
    assert_eq!(due.body["total"], 1);
    assert_eq!(due.body["tasks"][0]["isOverdue"], true);

    let bad_status = app.get("/api/tasks?status=done", &token).await;
    assert_eq!(bad_status.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_status.detail(), "Invalid status filter");

    let bad_date = app.get("/api/tasks?dueBefore=soon", &token).await;
    assert_eq!(bad_date.status, StatusCode::BAD_REQUEST);

    let by_priority = app
        .get("/api/tasks?sortBy=priority&order=desc", &token)
        .await;
    assert_eq!(by_priority.body["tasks"][0]["priority"], "high");
}

#[tokio::test]
async fn test_bulk_delete_and_stats() {
    let app = TestApp::new();
    let token = app.user_token("Ada", "ada@example.com").await;
    let other = app.user_token("Grace", "grace@example.com").await;

    for (title, status) in [("a", "completed"), ("b", "completed"), ("c", "todo")] {
        app.post(
            "/api/tasks",
            Some(&token),
            json!({ "title": title, "status": status }),
        )
        .await;
    }
    app.post(
        "/api/tasks",
        Some(&other),
        json!({ "title": "theirs", "status": "completed" }),
    )
    .await;

    let stats = app.get("/api/tasks/stats", &token).await;
    assert_eq!(stats.status, StatusCode::OK);
    let by_status = stats.body["byStatus"].as_array().unwrap();
    assert!(by_status.contains(&json!({ "status": "completed", "count": 2 })));
    assert!(by_status.contains(&json!({ "status": "todo", "count": 1 })));
    assert_eq!(
        stats.body["byPriority"],
        json!([{ "priority": "medium", "count": 3 }])
    );
    assert_eq!(stats.body["overdue"], 0);

    let missing = app.delete("/api/tasks/bulk", &token).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        missing.detail(),
        "Provide a status query param for bulk delete."
    );

    let deleted = app.delete("/api/tasks/bulk?status=completed", &token).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["deletedCount"], 2);

    assert_eq!(app.get("/api/tasks", &token).await.body["total"], 1);
    assert_eq!(app.get("/api/tasks", &other).await.body["total"], 1);
}
