/// Attendance: class attendance tracking and goal projection
///
/// This library tracks a student's per-subject attendance against a weekly
/// timetable and projects whether a target attendance percentage can still
/// be reached.
///
/// ### Modules
///
/// - `grid`: The in-memory timetable grid
/// - `aggregator`: Attendance counts and goal projections
/// - `registry`: The subject collection and its name index
/// - `sync`: The commit step that folds the grid into subjects
/// - `persist`: Debounced timetable writes
/// - `storage`: The storage trait and its SQLite implementation
/// - `state`: Application state shared by the handlers
///
/// ### Web API
///
/// The library exposes a RESTful API using Axum with the following endpoints:
///
/// - `GET/POST /subjects`: List or add subjects
/// - `GET/PATCH/DELETE /subjects/{id}`: Read, update or delete a subject
/// - `GET /subjects/{id}/goal`: Goal projection for a subject
/// - `GET /goals/{name}`: Goal projection for a subject name
/// - `GET /dashboard`: Average attendance and per-subject goals
/// - `GET/PUT /timetable`: Read or replace the whole timetable
/// - `GET /timetable/current`: The current week
/// - `GET/PUT /timetable/weeks/{week_key}`: Read or replace one week
/// - `PATCH /timetable/weeks/{week_key}/cells/{cell_id}`: Edit a cell
/// - `POST /timetable/weeks/{week_key}/cells/{cell_id}/holiday`: Toggle a holiday
/// - `POST /timetable/weeks/{week_key}/cells/{cell_id}/attendance`: Mark attendance
/// - `POST /timetable/commit`: Recompute and store every subject
/// - `POST /demo`: Load demo data

/// Attendance aggregation module
pub mod aggregator;

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Demo data module
pub mod demo;

/// Data transfer objects module
pub mod dto;

/// Error types module
pub mod errors;

/// Timetable grid module
pub mod grid;

/// Web API handlers module
pub mod handlers;

/// Data models module
pub mod models;

/// Debounced persistence module
pub mod persist;

/// Subject registry module
pub mod registry;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Application state module
pub mod state;

/// Storage trait module
pub mod storage;

/// Commit module
pub mod sync;

#[cfg(test)]
pub mod test_utils;

use axum::{
    routing::{get, post},
    Router,
};
use handlers::*;
use errors::ApiError;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Creates the application router with all routes
///
/// This function sets up the Axum router with all the API endpoints.
///
/// ### Arguments
///
/// * `state` - The application state to be shared with all handlers
///
/// ### Returns
///
/// An Axum Router configured with all routes and the application state
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        // Routes for adding and listing subjects
        .route("/subjects", post(create_subject_handler).get(list_subjects_handler))
        // Routes for a specific subject by ID
        .route(
            "/subjects/{id}",
            get(get_subject_handler)
                .patch(update_subject_handler)
                .delete(delete_subject_handler),
        )
        // Route for a subject's goal projection
        .route("/subjects/{id}/goal", get(get_subject_goal_handler))
        // Route for the goal projection of a subject name
        .route("/goals/{name}", get(get_goal_by_name_handler))
        // Route for the dashboard overview
        .route("/dashboard", get(dashboard_handler))
        // Routes for the whole timetable
        .route("/timetable", get(get_timetable_handler).put(put_timetable_handler))
        // Route for the current week
        .route("/timetable/current", get(get_current_week_handler))
        // Route for committing the timetable
        .route("/timetable/commit", post(commit_handler))
        // Routes for a single week
        .route("/timetable/weeks/{week_key}", get(get_week_handler).put(put_week_handler))
        // Routes for a single cell
        .route(
            "/timetable/weeks/{week_key}/cells/{cell_id}",
            axum::routing::patch(patch_cell_handler),
        )
        .route(
            "/timetable/weeks/{week_key}/cells/{cell_id}/holiday",
            post(toggle_holiday_handler),
        )
        .route(
            "/timetable/weeks/{week_key}/cells/{cell_id}/attendance",
            post(mark_attendance_handler),
        )
        // Route for loading demo data
        .route("/demo", post(load_demo_handler))
        .method_not_allowed_fallback(|| async { ApiError::MethodNotAllowed })
        .layer(CorsLayer::permissive())
        // Add the application state
        .with_state(state)
}

/// Runs the embedded migrations
///
/// This function applies all database migrations to set up the schema.
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Panics
///
/// This function will panic if the migrations fail to run
pub fn run_migrations(conn: &mut diesel::SqliteConnection) {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    // Define the embedded migrations
    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    // Run all pending migrations
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
}
