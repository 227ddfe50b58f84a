/// Data models module
///
/// This module defines the core data structures used throughout the application:
/// the timetable cells and their identifiers, subjects with their attendance
/// history, and the derived goal projection. Subjects and week documents map
/// to database tables; the goal is never stored.

// Re-export all model types
mod keys;
pub use keys::{CellId, WeekKey, TIME_SLOTS, WEEKDAYS};

mod cell;
pub use cell::{AttendanceMark, Cell, CellPatch, Timetable, Week};

mod json_column;
pub use json_column::{AttendanceLog, WeekCells};

mod subject;
pub use subject::{AttendanceRecord, Subject, CRITICAL_THRESHOLD};

mod timetable_week;
pub use timetable_week::TimetableWeek;

mod goal;
pub use goal::{AttendanceGoal, DEFAULT_TARGET_PERCENTAGE};
