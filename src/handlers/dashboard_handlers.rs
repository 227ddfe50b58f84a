use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{instrument, info};

use crate::dto::{DashboardDto, DemoSummaryDto, GoalQuery};
use crate::errors::ApiError;
use crate::state::AppState;

/// Handler for the dashboard overview
///
/// This function handles GET requests to `/dashboard`, with an optional
/// `target` query parameter used for every subject's goal projection.
///
/// ### Returns
///
/// The average attendance plus, per subject, its critical flag and goal
#[instrument(skip(state))]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GoalQuery>,
) -> Result<Json<DashboardDto>, ApiError> {
    let target = state.resolve_target(query.target)?;
    let dashboard = state.dashboard(target).await;

    info!(
        "Dashboard: {} subjects, average {}%",
        dashboard.subjects.len(),
        dashboard.average_attendance
    );
    Ok(Json(dashboard))
}

/// Handler for loading the demo data
///
/// This function handles POST requests to `/demo`. It writes five subjects
/// and replaces the timetable with one populated current week.
#[instrument(skip(state))]
pub async fn load_demo_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DemoSummaryDto>, ApiError> {
    info!("Loading demo data");

    let summary = state.load_demo(Utc::now()).await?;

    Ok(Json(summary))
}
