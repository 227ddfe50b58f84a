use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::dto::{CreateSubjectDto, GoalQuery, UpdateSubjectDto};
use crate::errors::ApiError;
use crate::models::{AttendanceGoal, Subject};
use crate::state::AppState;

/// Handler for adding a subject
///
/// This function handles POST requests to `/subjects`. A body carrying the id
/// of an existing subject replaces that subject.
///
/// ### Arguments
///
/// * `state` - The shared application state
/// * `payload` - The subject to add
///
/// ### Returns
///
/// The stored subject as JSON
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_subject_handler(
    // Extract the application state
    State(state): State<Arc<AppState>>,
    // Extract and deserialize the JSON request body
    Json(payload): Json<CreateSubjectDto>,
) -> Result<Json<Subject>, ApiError> {
    info!("Adding subject");

    let subject = state.add_subject(payload).await?;

    info!("Successfully stored subject with id: {}", subject.get_id());
    Ok(Json(subject))
}

/// Handler for listing all subjects
///
/// This function handles GET requests to `/subjects`.
#[instrument(skip(state))]
pub async fn list_subjects_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<Subject>> {
    debug!("Listing all subjects");

    let subjects = state.list_subjects().await;

    info!("Retrieved {} subjects", subjects.len());
    Json(subjects)
}

/// Handler for retrieving a specific subject
///
/// This function handles GET requests to `/subjects/{id}`.
///
/// ### Returns
///
/// The subject as JSON, or 404 if no subject has that id
#[instrument(skip(state), fields(subject_id = %id))]
pub async fn get_subject_handler(
    State(state): State<Arc<AppState>>,
    // Extract the subject ID from the URL path
    Path(id): Path<String>,
) -> Result<Json<Subject>, ApiError> {
    debug!("Getting subject");

    let subject = state.get_subject(&id).await.ok_or(ApiError::NotFound)?;
    Ok(Json(subject))
}

/// Handler for partially updating a subject
///
/// This function handles PATCH requests to `/subjects/{id}`. Fields missing
/// from the body are left unchanged.
#[instrument(skip(state, payload), fields(subject_id = %id))]
pub async fn update_subject_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSubjectDto>,
) -> Result<Json<Subject>, ApiError> {
    info!("Updating subject");

    let subject = state
        .update_subject(&id, payload)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!("Successfully updated subject");
    Ok(Json(subject))
}

/// Handler for deleting a subject
///
/// This function handles DELETE requests to `/subjects/{id}`.
///
/// ### Returns
///
/// 204 No Content on success, 404 if no subject had that id
#[instrument(skip(state), fields(subject_id = %id))]
pub async fn delete_subject_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("Deleting subject");

    if !state.delete_subject(&id).await? {
        debug!("Subject not found");
        return Err(ApiError::NotFound);
    }

    info!("Successfully deleted subject");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for a subject's goal projection
///
/// This function handles GET requests to `/subjects/{id}/goal`, with an
/// optional `target` query parameter. An unknown id yields the zeroed
/// projection rather than an error.
#[instrument(skip(state), fields(subject_id = %id))]
pub async fn get_subject_goal_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    // Extract the optional target percentage from the query string
    Query(query): Query<GoalQuery>,
) -> Result<Json<AttendanceGoal>, ApiError> {
    let target = state.resolve_target(query.target)?;
    debug!("Projecting goal with target {}", target);

    let goal = state.goal_for_subject(&id, target).await.unwrap_or_default();
    Ok(Json(goal))
}

/// Handler for the goal projection of a subject name
///
/// This function handles GET requests to `/goals/{name}`. The name is matched
/// exactly against timetable cells, whether or not a subject is registered.
#[instrument(skip(state), fields(name = %name))]
pub async fn get_goal_by_name_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<GoalQuery>,
) -> Result<Json<AttendanceGoal>, ApiError> {
    let target = state.resolve_target(query.target)?;
    Ok(Json(state.goal_for_name(&name, target).await))
}
