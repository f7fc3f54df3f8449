//! Integration tests for the toolbelt REST API.
//!
//! Drive the full router against an in-memory database via `oneshot`,
//! verifying status codes and JSON bodies. No listener is bound.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use toolbelt_core::crypto::MasterKey;
use toolbelt_core::vault::Vault;
use toolbelt_server::routes;
use toolbelt_server::state::AppState;

/// Build the app over a fresh in-memory database.
async fn test_app() -> Router {
    let pool = toolbelt_store::db::connect_in_memory().await.unwrap();
    let vault = Vault::new(MasterKey::from_passphrase("test-passphrase"), pool.clone());
    let state = Arc::new(AppState { pool, vault });
    routes::app(state, false)
}

/// Send one request and return `(status, parsed body)`. Empty bodies
/// come back as `Value::Null`.
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

// ── Health ───────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ── Notes ────────────────────────────────────────────────────────────

#[tokio::test]
async fn note_lifecycle() {
    let app = test_app().await;

    let (status, note) = send(
        &app,
        Method::POST,
        "/api/notes",
        Some(json!({"title": "groceries", "content": "milk"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = note["id"].as_str().unwrap().to_owned();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/notes/{id}"),
        Some(json!({"title": "groceries", "content": "milk, eggs"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "milk, eggs");
    assert_eq!(updated["created_at"], note["created_at"]);

    let (status, listed) = send(&app, Method::GET, "/api/notes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/notes/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/notes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn note_with_blank_title_is_rejected() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/notes",
        Some(json!({"title": "   ", "content": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

// ── Tasks ────────────────────────────────────────────────────────────

#[tokio::test]
async fn task_and_subtask_lifecycle() {
    let app = test_app().await;

    let (status, task) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({"title": "ship release", "description": "v1.2"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["completed"], false);
    let task_id = task["id"].as_str().unwrap().to_owned();

    let (status, subtask) = send(
        &app,
        Method::POST,
        &format!("/api/tasks/{task_id}/subtasks"),
        Some(json!({"title": "tag commit"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let subtask_id = subtask["id"].as_str().unwrap().to_owned();

    // Partial update touches only the flagged field.
    let (status, patched) = send(
        &app,
        Method::PUT,
        &format!("/api/tasks/{task_id}"),
        Some(json!({"completed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["completed"], true);
    assert_eq!(patched["title"], "ship release");

    let (status, fetched) = send(&app, Method::GET, &format!("/api/tasks/{task_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["subtasks"].as_array().unwrap().len(), 1);

    let (status, toggled) = send(
        &app,
        Method::PUT,
        &format!("/api/tasks/{task_id}/subtasks/{subtask_id}"),
        Some(json!({"completed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["completed"], true);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/tasks/{task_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn subtask_routes_are_scoped_to_parent_task() {
    let app = test_app().await;

    let (_, task_a) = send(&app, Method::POST, "/api/tasks", Some(json!({"title": "a"}))).await;
    let (_, task_b) = send(&app, Method::POST, "/api/tasks", Some(json!({"title": "b"}))).await;
    let a_id = task_a["id"].as_str().unwrap();
    let b_id = task_b["id"].as_str().unwrap();

    let (_, subtask) = send(
        &app,
        Method::POST,
        &format!("/api/tasks/{a_id}/subtasks"),
        Some(json!({"title": "step"})),
    )
    .await;
    let subtask_id = subtask["id"].as_str().unwrap();

    // Addressing the subtask through the wrong parent is a 404.
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/tasks/{b_id}/subtasks/{subtask_id}"),
        Some(json!({"completed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn subtask_on_unknown_task_is_not_found() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/tasks/no-such-task/subtasks",
        Some(json!({"title": "orphan"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Scripts ──────────────────────────────────────────────────────────

fn curl_script() -> Value {
    json!({
        "name": "api call",
        "content": "curl -H 'Authorization: $J{TOKEN}' $J{URL}",
        "variables": [
            {"name": "TOKEN", "placeholder": "bearer token", "required": true, "type": "password"},
            {"name": "URL", "placeholder": "endpoint", "required": true}
        ]
    })
}

#[tokio::test]
async fn script_execute_substitutes_and_records_history() {
    let app = test_app().await;

    let (status, script) = send(&app, Method::POST, "/api/scripts", Some(curl_script())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = script["id"].as_str().unwrap().to_owned();
    assert_eq!(script["variables"].as_array().unwrap().len(), 2);

    let (status, result) = send(
        &app,
        Method::POST,
        &format!("/api/scripts/{id}/execute"),
        Some(json!({"variables": {"TOKEN": "abc123", "URL": "https://x"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        result["processed_content"],
        "curl -H 'Authorization: abc123' https://x"
    );
    assert_eq!(result["variables_used"]["TOKEN"], "abc123");

    let (status, history) = send(
        &app,
        Method::GET,
        &format!("/api/scripts/{id}/executions"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0]["processed_content"],
        "curl -H 'Authorization: abc123' https://x"
    );
}

#[tokio::test]
async fn script_execute_reports_all_missing_variables() {
    let app = test_app().await;

    let (_, script) = send(&app, Method::POST, "/api/scripts", Some(curl_script())).await;
    let id = script["id"].as_str().unwrap().to_owned();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/scripts/{id}/execute"),
        Some(json!({"variables": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("TOKEN"), "message was: {message}");
    assert!(message.contains("URL"), "message was: {message}");

    // A rejected execution leaves no history entry.
    let (_, history) = send(
        &app,
        Method::GET,
        &format!("/api/scripts/{id}/executions"),
        None,
    )
    .await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn script_execute_unknown_script_is_not_found() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/scripts/no-such-script/execute",
        Some(json!({"variables": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn script_update_replaces_variable_set() {
    let app = test_app().await;

    let (_, script) = send(&app, Method::POST, "/api/scripts", Some(curl_script())).await;
    let id = script["id"].as_str().unwrap().to_owned();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/scripts/{id}"),
        Some(json!({
            "name": "ping",
            "content": "ping $J{HOST}",
            "variables": [{"name": "HOST", "placeholder": "hostname", "required": true}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = updated["variables"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["HOST"]);
}

// ── Secrets ──────────────────────────────────────────────────────────

#[tokio::test]
async fn secret_roundtrip_over_http() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/secrets/github-token",
        Some(json!({"value": "ghp_abc123"})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, secret) = send(&app, Method::GET, "/api/secrets/github-token", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(secret["name"], "github-token");
    assert_eq!(secret["value"], "ghp_abc123");
}

#[tokio::test]
async fn secret_listing_exposes_metadata_only() {
    let app = test_app().await;

    send(
        &app,
        Method::PUT,
        "/api/secrets/db-password",
        Some(json!({"value": "hunter2"})),
    )
    .await;

    let (status, listed) = send(&app, Method::GET, "/api/secrets", None).await;
    assert_eq!(status, StatusCode::OK);

    let entries = listed.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "db-password");
    assert!(entries[0].get("value").is_none());
    assert!(entries[0].get("ciphertext").is_none());
    assert!(!listed.to_string().contains("hunter2"));
}

#[tokio::test]
async fn empty_secret_value_is_rejected() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/secrets/blank",
        Some(json!({"value": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn unknown_secret_is_not_found() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/secrets/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn secret_delete_is_idempotent() {
    let app = test_app().await;

    send(
        &app,
        Method::PUT,
        "/api/secrets/doomed",
        Some(json!({"value": "x"})),
    )
    .await;

    let (status, _) = send(&app, Method::DELETE, "/api/secrets/doomed", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Deleting again is still a 204.
    let (status, _) = send(&app, Method::DELETE, "/api/secrets/doomed", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/secrets/doomed", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn secret_overwrite_replaces_value() {
    let app = test_app().await;

    send(
        &app,
        Method::PUT,
        "/api/secrets/rotated",
        Some(json!({"value": "old"})),
    )
    .await;
    send(
        &app,
        Method::PUT,
        "/api/secrets/rotated",
        Some(json!({"value": "new"})),
    )
    .await;

    let (_, secret) = send(&app, Method::GET, "/api/secrets/rotated", None).await;
    assert_eq!(secret["value"], "new");
}
