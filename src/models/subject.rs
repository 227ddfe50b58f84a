use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AttendanceLog;

/// Percentage below which a subject is considered critical
pub const CRITICAL_THRESHOLD: i32 = 75;

/// One held class in a subject's attendance history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub present: bool,
    pub date: DateTime<Utc>,
    pub time_slot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<u8>,
}

/// Represents a subject with its cached attendance percentage
///
/// This struct maps directly to the `subjects` table in the database.
/// Timetable cells refer to subjects by `name`, not by `id`; the link is
/// resolved through the registry's name index and may dangle.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::subjects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Subject {
    /// Unique identifier for the subject (UUID v4 as string)
    id: String,

    /// Display name, also the key used to match timetable cells
    name: String,

    /// Cached attendance percentage, recomputed on commit
    percentage: i32,

    /// Attendance history, replaced wholesale on commit
    attendance: AttendanceLog,
}

impl Subject {
    /// Creates a new subject with a fresh id and no attendance
    pub fn new(name: String) -> Self {
        Self::new_with_fields(Uuid::new_v4().to_string(), name, 0, Vec::new())
    }

    /// Creates a subject with all fields specified
    ///
    /// The percentage is clamped to 0..=100.
    pub fn new_with_fields(id: String, name: String, percentage: i32, attendance: Vec<AttendanceRecord>) -> Self {
        Self {
            id,
            name,
            percentage: percentage.clamp(0, 100),
            attendance: AttendanceLog(attendance),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn get_percentage(&self) -> i32 {
        self.percentage
    }

    pub fn set_percentage(&mut self, percentage: i32) {
        self.percentage = percentage.clamp(0, 100);
    }

    pub fn get_attendance(&self) -> &[AttendanceRecord] {
        &self.attendance.0
    }

    /// Replaces the whole attendance history
    pub fn set_attendance(&mut self, attendance: Vec<AttendanceRecord>) {
        self.attendance = AttendanceLog(attendance);
    }

    /// A subject is critical while its cached percentage is below 75
    pub fn is_critical(&self) -> bool {
        self.percentage < CRITICAL_THRESHOLD
    }
}
