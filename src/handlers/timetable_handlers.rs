use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::dto::{CellUpdateDto, CommitSummary, MarkAttendanceDto, WeekDto};
use crate::errors::ApiError;
use crate::grid::MarkOutcome;
use crate::models::{CellId, CellPatch, Timetable, Week, WeekKey};
use crate::state::AppState;

/// Parses the week key and cell id of a cell route
fn parse_cell_path(week_key: &str, cell_id: &str) -> Result<(WeekKey, CellId), ApiError> {
    Ok((week_key.parse()?, cell_id.parse()?))
}

/// Handler for reading the whole timetable
///
/// This function handles GET requests to `/timetable`.
#[instrument(skip(state))]
pub async fn get_timetable_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Timetable> {
    let timetable = state.timetable().await;
    debug!("Returning {} weeks", timetable.len());
    Json(timetable)
}

/// Handler for replacing the whole timetable
///
/// This function handles PUT requests to `/timetable`. The new timetable is
/// written to storage before it replaces the in-memory grid, so a failed
/// write leaves the grid as it was.
///
/// ### Returns
///
/// The grid after the replacement, with every week back-filled
#[instrument(skip(state, payload), fields(weeks = payload.len()))]
pub async fn put_timetable_handler(
    State(state): State<Arc<AppState>>,
    // Extract and deserialize the JSON request body
    Json(payload): Json<Timetable>,
) -> Result<Json<Timetable>, ApiError> {
    info!("Replacing timetable");

    let timetable = state.replace_timetable(payload).await?;

    info!("Successfully replaced timetable");
    Ok(Json(timetable))
}

/// Handler for the week containing today
///
/// This function handles GET requests to `/timetable/current`.
#[instrument(skip(state))]
pub async fn get_current_week_handler(
    State(state): State<Arc<AppState>>,
) -> Json<WeekDto> {
    let week_key = WeekKey::containing(Utc::now().date_naive());
    debug!("Current week is {}", week_key);

    let cells = state.week(&week_key).await;
    Json(WeekDto { week_key: week_key.to_string(), cells })
}

/// Handler for reading one week
///
/// This function handles GET requests to `/timetable/weeks/{week_key}`. A
/// week that was never visited comes back with every cell defaulted.
#[instrument(skip(state), fields(week_key = %week_key))]
pub async fn get_week_handler(
    State(state): State<Arc<AppState>>,
    // Extract the week key from the URL path
    Path(week_key): Path<String>,
) -> Result<Json<WeekDto>, ApiError> {
    let key: WeekKey = week_key.parse()?;
    let cells = state.week(&key).await;
    Ok(Json(WeekDto { week_key: key.to_string(), cells }))
}

/// Handler for replacing one week
///
/// This function handles PUT requests to `/timetable/weeks/{week_key}`. Only
/// that week's document is written.
#[instrument(skip(state, payload), fields(week_key = %week_key))]
pub async fn put_week_handler(
    State(state): State<Arc<AppState>>,
    Path(week_key): Path<String>,
    Json(payload): Json<Week>,
) -> Result<Json<WeekDto>, ApiError> {
    info!("Replacing week");

    let key: WeekKey = week_key.parse()?;
    let cells = state.replace_week(&key, payload).await?;

    Ok(Json(WeekDto { week_key: key.to_string(), cells }))
}

/// Handler for editing a cell
///
/// This function handles PATCH requests to
/// `/timetable/weeks/{week_key}/cells/{cell_id}`. Only the fields present in
/// the body are changed.
///
/// ### Arguments
///
/// * `state` - The shared application state
/// * `params` - The week key and cell id extracted from the URL path
/// * `payload` - The fields to overwrite
///
/// ### Returns
///
/// The cell after the edit
#[instrument(skip(state, payload), fields(week_key = %week_key, cell_id = %cell_id))]
pub async fn patch_cell_handler(
    State(state): State<Arc<AppState>>,
    Path((week_key, cell_id)): Path<(String, String)>,
    Json(payload): Json<CellPatch>,
) -> Result<Json<CellUpdateDto>, ApiError> {
    debug!("Editing cell");

    let (key, id) = parse_cell_path(&week_key, &cell_id)?;
    let cell = state.set_cell(&key, &id, payload).await;

    Ok(Json(CellUpdateDto { week_key: key.to_string(), cell_id: id.to_string(), cell, applied: true }))
}

/// Handler for toggling a cell's holiday flag
///
/// This function handles POST requests to
/// `/timetable/weeks/{week_key}/cells/{cell_id}/holiday`.
#[instrument(skip(state), fields(week_key = %week_key, cell_id = %cell_id))]
pub async fn toggle_holiday_handler(
    State(state): State<Arc<AppState>>,
    Path((week_key, cell_id)): Path<(String, String)>,
) -> Result<Json<CellUpdateDto>, ApiError> {
    let (key, id) = parse_cell_path(&week_key, &cell_id)?;
    let cell = state.toggle_holiday(&key, &id).await;

    info!("Cell is now {}", if cell.is_holiday { "a holiday" } else { "a class" });
    Ok(Json(CellUpdateDto { week_key: key.to_string(), cell_id: id.to_string(), cell, applied: true }))
}

/// Handler for marking attendance on a cell
///
/// This function handles POST requests to
/// `/timetable/weeks/{week_key}/cells/{cell_id}/attendance`. Marking a
/// holiday is accepted but ignored, reported with `applied: false`.
#[instrument(skip(state, payload), fields(week_key = %week_key, cell_id = %cell_id, present = payload.present))]
pub async fn mark_attendance_handler(
    State(state): State<Arc<AppState>>,
    Path((week_key, cell_id)): Path<(String, String)>,
    Json(payload): Json<MarkAttendanceDto>,
) -> Result<Json<CellUpdateDto>, ApiError> {
    let (key, id) = parse_cell_path(&week_key, &cell_id)?;
    let (cell, outcome) = state.mark_attendance(&key, &id, payload.present).await;

    let applied = outcome == MarkOutcome::Applied;
    if !applied {
        debug!("Ignored mark on holiday cell");
    }
    Ok(Json(CellUpdateDto { week_key: key.to_string(), cell_id: id.to_string(), cell, applied }))
}

/// Handler for committing the timetable
///
/// This function handles POST requests to `/timetable/commit`. Every subject
/// seen in the grid is created or updated, then the grid itself is written.
///
/// ### Returns
///
/// A summary of the writes, or a 500 if any write failed
#[instrument(skip(state))]
pub async fn commit_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CommitSummary>, ApiError> {
    info!("Committing timetable");

    let summary = state.commit().await?;

    Ok(Json(summary))
}
