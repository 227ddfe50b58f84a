use serde::{Deserialize, Serialize};

use crate::models::{AttendanceGoal, AttendanceRecord, Cell, Subject, Week};

pub use crate::sync::CommitSummary;

/// Data transfer object for adding a subject
///
/// Adding is create-or-update: a subject with a known `id` is replaced, and a
/// missing `id` gets a fresh one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateSubjectDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The subject name, matched exactly against timetable cells
    pub name: String,

    #[serde(default)]
    pub percentage: i32,

    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

/// Data transfer object for a partial subject update
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct UpdateSubjectDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<Vec<AttendanceRecord>>,
}

/// Query string for goal projections, e.g. `?target=80`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(default)]
pub struct GoalQuery {
    pub target: Option<f64>,
}

/// Body of an attendance mark request
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkAttendanceDto {
    pub present: bool,
}

/// One week of the grid together with its key
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WeekDto {
    pub week_key: String,
    pub cells: Week,
}

/// Response to every single-cell edit
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CellUpdateDto {
    pub week_key: String,
    pub cell_id: String,
    /// The cell after the edit
    pub cell: Cell,
    /// False when the edit was ignored, e.g. a mark on a holiday
    pub applied: bool,
}

/// One dashboard row
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubjectSummaryDto {
    pub subject: Subject,
    pub is_critical: bool,
    pub goal: AttendanceGoal,
}

/// Dashboard overview
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DashboardDto {
    /// Rounded mean of the cached subject percentages
    pub average_attendance: u32,
    pub target_percentage: f64,
    pub subjects: Vec<SubjectSummaryDto>,
}

/// What loading the demo data wrote
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DemoSummaryDto {
    pub subjects: usize,
    pub week_key: String,
}

#[cfg(test)]
mod tests;
