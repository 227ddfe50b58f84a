use serde::{Deserialize, Serialize};

/// Default target percentage for goal projections
pub const DEFAULT_TARGET_PERCENTAGE: f64 = 75.0;

/// Goal projection for one subject, derived from the timetable on every query
///
/// The default value is the degenerate projection returned when there is no
/// data for the subject: every count zero and `is_possible` false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceGoal {
    /// Percentage attended out of held (marked) classes
    pub current_attendance: u32,
    /// Scheduled, non-holiday classes: held plus remaining
    pub total_classes: u32,
    pub classes_attended: u32,
    /// Further classes that must be attended to reach the target
    pub classes_needed: u32,
    pub is_possible: bool,
    /// Scheduled classes that are still unmarked
    pub remaining_classes: u32,
    /// Classes that must be attended out of the whole schedule
    pub total_needed: u32,
    /// Best-case final percentage if every remaining class is attended
    pub future_projection: u32,
    pub weekly_classes: u32,
    pub weeks_needed: u32,
}
