use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cells of one week keyed by their `day-<weekday>-<slot>` id
pub type Week = BTreeMap<String, Cell>;

/// Weeks keyed by their `week-<number>-<yyyy>` key
pub type Timetable = BTreeMap<String, Week>;

/// Tri-state attendance of a single class
///
/// `Unmarked` is the initial state and means the class has not happened yet;
/// it is distinct from `Absent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMark {
    Present,
    Absent,
    #[default]
    Unmarked,
}

impl AttendanceMark {
    pub fn from_present(present: bool) -> Self {
        if present { AttendanceMark::Present } else { AttendanceMark::Absent }
    }
}

/// One (weekday, time slot) slot in a week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Subject taught in this slot; empty when unassigned
    #[serde(default)]
    pub subject_name: String,

    #[serde(default)]
    pub attendance_mark: AttendanceMark,

    /// Holiday cells are ignored by every aggregation
    #[serde(default)]
    pub is_holiday: bool,

    /// 1 (Monday) to 5 (Friday)
    pub weekday: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Cell {
    /// Creates an unassigned, unmarked, non-holiday cell
    pub fn new(weekday: u8) -> Self {
        Self {
            subject_name: String::new(),
            attendance_mark: AttendanceMark::Unmarked,
            is_holiday: false,
            weekday,
            notes: None,
        }
    }

    /// Whether this cell is a scheduled, non-holiday class of `subject_name`
    pub fn counts_toward(&self, subject_name: &str) -> bool {
        !self.is_holiday && self.subject_name == subject_name
    }
}

/// Partial update of a cell; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellPatch {
    pub subject_name: Option<String>,
    pub attendance_mark: Option<AttendanceMark>,
    pub is_holiday: Option<bool>,
    pub notes: Option<String>,
}

impl CellPatch {
    pub fn apply(self, cell: &mut Cell) {
        if let Some(subject_name) = self.subject_name {
            cell.subject_name = subject_name;
        }
        if let Some(mark) = self.attendance_mark {
            cell.attendance_mark = mark;
        }
        if let Some(is_holiday) = self.is_holiday {
            cell.is_holiday = is_holiday;
        }
        if let Some(notes) = self.notes {
            cell.notes = Some(notes);
        }
    }
}
