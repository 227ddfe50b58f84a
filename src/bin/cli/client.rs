use attendance::dto::{
    CellUpdateDto, CommitSummary, CreateSubjectDto, DashboardDto, DemoSummaryDto,
    MarkAttendanceDto, WeekDto,
};
use attendance::models::{AttendanceGoal, CellPatch, Subject};
use reqwest::{Client, Url};

/// Error type for CLI client operations
#[derive(Debug)]
pub enum ClientError {
    /// Server returned an error status with a message body
    Server { status: reqwest::StatusCode, message: String },
    /// Network/connection/request error
    Request(reqwest::Error),
    /// The configured server URL cannot carry a path
    InvalidUrl(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status.as_u16(), message)
            }
            ClientError::Request(err) => write!(f, "{}", err),
            ClientError::InvalidUrl(url) => write!(f, "Invalid server URL: {}", url),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Request(err) => Some(err),
            ClientError::Server { .. } | ClientError::InvalidUrl(_) => None,
        }
    }
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => body.get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// Query parameters for an optional goal target
fn target_query(target: Option<f64>) -> Vec<(&'static str, String)> {
    target.map(|t| vec![("target", t.to_string())]).unwrap_or_default()
}

/// HTTP client wrapper for communicating with the attendance server
pub struct AttendanceClient {
    /// The base URL of the server (e.g. "http://localhost:3000")
    base_url: String,
    /// The underlying HTTP client
    client: Client,
}

impl AttendanceClient {
    /// Creates a new AttendanceClient
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the attendance server
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// Builds an endpoint URL, percent-encoding each path segment
    ///
    /// Cell ids contain spaces and colons, and subject names may too.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Subject endpoints ────────────────────────────────────────────

    /// Lists all subjects
    pub async fn list_subjects(&self) -> Result<Vec<Subject>, ClientError> {
        let url = self.url(&["subjects"])?;
        let response = self.client.get(url).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Gets a specific subject by ID
    pub async fn get_subject(&self, id: &str) -> Result<Subject, ClientError> {
        let url = self.url(&["subjects", id])?;
        let response = self.client.get(url).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Adds a subject, or replaces the one with the same id
    pub async fn create_subject(&self, dto: &CreateSubjectDto) -> Result<Subject, ClientError> {
        let url = self.url(&["subjects"])?;
        let response = self.client.post(url).json(dto).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Deletes a subject
    pub async fn delete_subject(&self, id: &str) -> Result<(), ClientError> {
        let url = self.url(&["subjects", id])?;
        self.client.delete(url).send().await.map_err(ClientError::Request)?.check().await?;
        Ok(())
    }

    /// Gets the goal projection of a registered subject
    pub async fn subject_goal(&self, id: &str, target: Option<f64>) -> Result<AttendanceGoal, ClientError> {
        let url = self.url(&["subjects", id, "goal"])?;
        let response = self.client.get(url).query(&target_query(target)).send().await
            .map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Gets the goal projection of a subject name
    pub async fn goal_by_name(&self, name: &str, target: Option<f64>) -> Result<AttendanceGoal, ClientError> {
        let url = self.url(&["goals", name])?;
        let response = self.client.get(url).query(&target_query(target)).send().await
            .map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Gets the dashboard overview
    pub async fn dashboard(&self, target: Option<f64>) -> Result<DashboardDto, ClientError> {
        let url = self.url(&["dashboard"])?;
        let response = self.client.get(url).query(&target_query(target)).send().await
            .map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    // ── Timetable endpoints ──────────────────────────────────────────

    /// Gets one week, initialized if it was never visited
    pub async fn get_week(&self, week_key: &str) -> Result<WeekDto, ClientError> {
        let url = self.url(&["timetable", "weeks", week_key])?;
        let response = self.client.get(url).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Gets the week containing today
    pub async fn current_week(&self) -> Result<WeekDto, ClientError> {
        let url = self.url(&["timetable", "current"])?;
        let response = self.client.get(url).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Merges a patch into a cell
    pub async fn set_cell(&self, week_key: &str, cell_id: &str, patch: &CellPatch) -> Result<CellUpdateDto, ClientError> {
        let url = self.url(&["timetable", "weeks", week_key, "cells", cell_id])?;
        let response = self.client.patch(url).json(patch).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Toggles a cell's holiday flag
    pub async fn toggle_holiday(&self, week_key: &str, cell_id: &str) -> Result<CellUpdateDto, ClientError> {
        let url = self.url(&["timetable", "weeks", week_key, "cells", cell_id, "holiday"])?;
        let response = self.client.post(url).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Marks a cell present or absent
    pub async fn mark_attendance(&self, week_key: &str, cell_id: &str, present: bool) -> Result<CellUpdateDto, ClientError> {
        let url = self.url(&["timetable", "weeks", week_key, "cells", cell_id, "attendance"])?;
        let dto = MarkAttendanceDto { present };
        let response = self.client.post(url).json(&dto).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Commits the timetable into the subjects
    pub async fn commit(&self) -> Result<CommitSummary, ClientError> {
        let url = self.url(&["timetable", "commit"])?;
        let response = self.client.post(url).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }

    /// Loads the demo data
    pub async fn load_demo(&self) -> Result<DemoSummaryDto, ClientError> {
        let url = self.url(&["demo"])?;
        let response = self.client.post(url).send().await.map_err(ClientError::Request)?.check().await?;
        response.json().await.map_err(ClientError::Request)
    }
}
