/// Integration tests for subject functionality
///
/// This file contains tests for subject operations:
/// - Adding subjects, with and without a known id
/// - Getting, listing, updating and deleting subjects
/// - Handling non-existent subjects

use axum::http::StatusCode;
use serde_json::json;
use attendance::models::Subject;

mod common;
use common::*;

/// Tests adding a subject via the API
///
/// This test verifies:
/// 1. A POST request to /subjects creates a subject with a fresh id
/// 2. The subject can be read back by that id
#[tokio::test]
async fn test_create_and_get_subject() {
    let mut app = create_test_app().await;

    let subject = create_subject(&mut app, "Mathematics", 85).await;
    assert_eq!(subject.get_name(), "Mathematics");
    assert_eq!(subject.get_percentage(), 85);
    assert!(!subject.get_id().is_empty());

    let (status, body) = send(&mut app, "GET", &format!("/subjects/{}", subject.get_id()), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Subject = serde_json::from_value(body).unwrap();
    assert_eq!(fetched, subject);
}

/// Tests that adding with an existing id replaces that subject
#[tokio::test]
async fn test_create_with_known_id_replaces() {
    let mut app = create_test_app().await;
    let subject = create_subject(&mut app, "Physics", 70).await;

    let (status, body) = send(&mut app, "POST", "/subjects", Some(json!({
        "id": subject.get_id(),
        "name": "Physics",
        "percentage": 72
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["percentage"], 72);

    let (_, list) = send(&mut app, "GET", "/subjects", None).await;
    let subjects: Vec<Subject> = serde_json::from_value(list).unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0].get_percentage(), 72);
}

/// Tests listing subjects, ordered by name
#[tokio::test]
async fn test_list_subjects() {
    let mut app = create_test_app().await;
    create_subject(&mut app, "Physics", 70).await;
    create_subject(&mut app, "Chemistry", 75).await;
    create_subject(&mut app, "English", 80).await;

    let (status, body) = send(&mut app, "GET", "/subjects", None).await;
    assert_eq!(status, StatusCode::OK);

    let subjects: Vec<Subject> = serde_json::from_value(body).unwrap();
    let names: Vec<String> = subjects.iter().map(|s| s.get_name()).collect();
    assert_eq!(names, vec!["Chemistry", "English", "Physics"]);
}

/// Tests a partial update: only the fields sent change
#[tokio::test]
async fn test_update_subject() {
    let mut app = create_test_app().await;
    let subject = create_subject(&mut app, "English", 80).await;

    let uri = format!("/subjects/{}", subject.get_id());
    let (status, body) = send(&mut app, "PATCH", &uri, Some(json!({ "percentage": 60 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "English");
    assert_eq!(body["percentage"], 60);

    let (status, _) = send(&mut app, "PATCH", "/subjects/missing", Some(json!({ "percentage": 60 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Tests deleting a subject
///
/// This test verifies:
/// 1. The first DELETE returns 204 No Content
/// 2. The subject is then gone, and a second DELETE returns 404
#[tokio::test]
async fn test_delete_subject() {
    let mut app = create_test_app().await;
    let subject = create_subject(&mut app, "Chemistry", 75).await;
    let uri = format!("/subjects/{}", subject.get_id());

    let (status, _) = send(&mut app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&mut app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&mut app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Tests getting a subject that doesn't exist
#[tokio::test]
async fn test_get_nonexistent_subject() {
    let mut app = create_test_app().await;

    let (status, body) = send(&mut app, "GET", "/subjects/no-such-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Subject not found");
}

/// Tests that an unknown subject has the zeroed goal
#[tokio::test]
async fn test_goal_for_unknown_subject_is_zeroed() {
    let mut app = create_test_app().await;

    let (status, body) = send(&mut app, "GET", "/subjects/no-such-id/goal", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_classes"], 0);
    assert_eq!(body["is_possible"], false);
}
