//! Attendance aggregation
//!
//! Pure functions over an in-memory timetable. Nothing here can fail: absent
//! or unknown data yields the zeroed `AttendanceGoal`.

use crate::models::{AttendanceGoal, AttendanceMark, Subject, Timetable, WEEKDAYS};

/// Counts of one subject's scheduled, non-holiday classes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub attended: u32,
    pub absent: u32,
    pub unmarked: u32,
}

impl ClassCounts {
    pub fn total_scheduled(&self) -> u32 {
        self.attended + self.absent + self.unmarked
    }

    /// Classes already marked either way
    pub fn held(&self) -> u32 {
        self.attended + self.absent
    }

    pub fn remaining(&self) -> u32 {
        self.unmarked
    }
}

/// Rounds `part / whole * 100` half-up; 0 when `whole` is 0
pub fn rounded_percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}

/// Counts every class of `subject_name` across all weeks, holidays excluded
pub fn count_classes(timetable: &Timetable, subject_name: &str) -> ClassCounts {
    let mut counts = ClassCounts::default();
    for cell in timetable.values().flat_map(|week| week.values()) {
        if !cell.counts_toward(subject_name) {
            continue;
        }
        match cell.attendance_mark {
            AttendanceMark::Present => counts.attended += 1,
            AttendanceMark::Absent => counts.absent += 1,
            AttendanceMark::Unmarked => counts.unmarked += 1,
        }
    }
    counts
}

/// Number of weekday classes of `subject_name`, summed over every stored week
///
/// With more than one stored week this is the total across weeks, not the
/// frequency of a single week.
pub fn weekly_class_count(timetable: &Timetable, subject_name: &str) -> u32 {
    timetable
        .values()
        .flat_map(|week| week.values())
        .filter(|cell| cell.counts_toward(subject_name) && WEEKDAYS.contains(&cell.weekday))
        .count() as u32
}

/// Projects whether `target_percentage` is still reachable for `subject_name`
///
/// ### Arguments
///
/// * `timetable` - The full grid to scan
/// * `subject_name` - Exact, case-sensitive subject name to match cells on
/// * `target_percentage` - Percentage to reach by the end of the schedule
///
/// ### Returns
///
/// The goal projection, or the zeroed projection when the subject has no
/// scheduled classes. An empty name means "unassigned" and never matches.
pub fn calculate_attendance_goal(timetable: &Timetable, subject_name: &str, target_percentage: f64) -> AttendanceGoal {
    if subject_name.is_empty() {
        return AttendanceGoal::default();
    }
    let counts = count_classes(timetable, subject_name);
    let total = counts.total_scheduled();
    if total == 0 {
        return AttendanceGoal::default();
    }

    let total_needed = (target_percentage * f64::from(total) / 100.0).ceil().max(0.0) as u32;
    let classes_needed = total_needed.saturating_sub(counts.attended);
    let weekly_classes = weekly_class_count(timetable, subject_name);
    let weeks_needed = if weekly_classes > 0 {
        classes_needed.div_ceil(weekly_classes)
    } else {
        0
    };

    AttendanceGoal {
        current_attendance: rounded_percentage(counts.attended, counts.held()),
        total_classes: total,
        classes_attended: counts.attended,
        classes_needed,
        is_possible: classes_needed <= counts.remaining(),
        remaining_classes: counts.remaining(),
        total_needed,
        future_projection: rounded_percentage(counts.attended + counts.remaining(), total),
        weekly_classes,
        weeks_needed,
    }
}

/// Goal projection for a registered subject, matched by its name
pub fn subject_goal(timetable: &Timetable, subject: &Subject, target_percentage: f64) -> AttendanceGoal {
    calculate_attendance_goal(timetable, &subject.get_name(), target_percentage)
}

/// Whether a subject's cached percentage is below the fixed critical threshold
pub fn is_subject_critical(subject: &Subject) -> bool {
    subject.is_critical()
}

/// Rounded mean of the cached percentages; 0 without subjects
pub fn average_attendance(subjects: &[Subject]) -> u32 {
    if subjects.is_empty() {
        return 0;
    }
    let total: i64 = subjects.iter().map(|s| i64::from(s.get_percentage())).sum();
    (total as f64 / subjects.len() as f64).round() as u32
}

#[cfg(test)]
mod tests;
