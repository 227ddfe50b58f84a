/// Common test utilities for attendance integration tests
///
/// This file contains shared functions for all integration tests, including
/// test application setup and helpers for the requests most tests repeat.

use attendance::{
    create_app,
    db::init_pool,
    models::Subject,
    state::AppState,
    storage::SqliteStorage,
};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::Service;

/// Creates a test application with an in-memory SQLite database
///
/// This helper function:
/// 1. Creates a shared in-memory SQLite database unique to the test
/// 2. Runs migrations to set up the schema
/// 3. Loads the application state and builds the router
///
/// The debounce window is a minute, so the background writer never fires
/// while a test runs.
///
/// ### Returns
///
/// An Axum Router configured with all routes and connected to an in-memory database
pub async fn create_test_app() -> Router {
    // Plain ":memory:" would give every pooled connection its own database
    let database_url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = Arc::new(init_pool(&database_url));

    let conn = &mut pool.get().unwrap();
    attendance::run_migrations(conn);

    let state = AppState::load(SqliteStorage::new(pool.clone()), Duration::from_secs(60), 75.0).await;
    create_app(Arc::new(state))
}

/// Sends a request and returns the status with the parsed JSON body
///
/// An empty body parses as `Value::Null`.
pub async fn send(app: &mut Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.call(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Adds a subject via the API
///
/// ### Arguments
///
/// * `app` - The test application
/// * `name` - The name for the new subject
/// * `percentage` - Its starting cached percentage
///
/// ### Returns
///
/// The created Subject
pub async fn create_subject(app: &mut Router, name: &str, percentage: i32) -> Subject {
    let (status, body) = send(app, "POST", "/subjects", Some(json!({
        "name": name,
        "percentage": percentage
    }))).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_value(body).unwrap()
}

/// Assigns a subject to a cell, optionally with a mark
pub async fn set_cell(app: &mut Router, week_key: &str, cell_id: &str, subject: &str, mark: Option<&str>) -> Value {
    let uri = format!("/timetable/weeks/{}/cells/{}", week_key, encode(cell_id));
    let mut patch = json!({ "subject_name": subject });
    if let Some(mark) = mark {
        patch["attendance_mark"] = json!(mark);
    }
    let (status, body) = send(app, "PATCH", &uri, Some(patch)).await;
    assert_eq!(status, StatusCode::OK);
    body
}

/// Percent-encodes the spaces in a cell id for use in a path
pub fn encode(cell_id: &str) -> String {
    cell_id.replace(' ', "%20")
}
