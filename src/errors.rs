use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json
};
use thiserror::Error;
use tracing::error;

/// Errors raised while parsing week keys and cell identifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid week key: {0}")]
    InvalidWeekKey(String),
    #[error("Invalid cell id: {0}")]
    InvalidCellId(String),
    #[error("Weekday must be between 1 and 5, got {0}")]
    InvalidWeekday(u8),
    #[error("Unknown time slot: {0}")]
    UnknownTimeSlot(String),
    #[error("Cell {cell_id} has weekday {found}, expected {expected}")]
    WeekdayMismatch { cell_id: String, expected: u8, found: u8 },
}

/// Errors raised by the commit step
///
/// Subjects written before the failing write are not rolled back.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Failed to save subject '{name}': {source}")]
    SubjectWrite {
        name: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Failed to save timetable: {0}")]
    TimetableWrite(#[source] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
    #[error("Subject not found")]
    NotFound,
    #[error("{0}")]
    InvalidGrid(#[from] GridError),
    #[error("Invalid target percentage: {0}")]
    InvalidTarget(String),
    #[error("Commit failed: {0}")]
    Commit(#[from] CommitError),
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Database(err) => {
                error!("Database error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Subject not found".to_string()),
            ApiError::InvalidGrid(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::InvalidTarget(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Commit(err) => {
                error!("Commit failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error saving timetable. Please try again.".to_string())
            }
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string()),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
