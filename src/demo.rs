//! Demo data: five subjects and one populated week

use chrono::{DateTime, Utc};

use crate::grid::default_week;
use crate::models::{AttendanceMark, AttendanceRecord, CellId, Subject, Week};

/// (weekday, slot, subject, mark) for every assigned demo cell
const DEMO_CLASSES: &[(u8, &str, &str, AttendanceMark)] = &[
    (1, "9:00 AM", "Mathematics", AttendanceMark::Present),
    (1, "10:00 AM", "English", AttendanceMark::Unmarked),
    (1, "11:00 AM", "Chemistry", AttendanceMark::Unmarked),
    (1, "1:00 PM", "Computer Science", AttendanceMark::Present),
    (1, "2:00 PM", "Physics", AttendanceMark::Unmarked),
    (2, "9:00 AM", "Chemistry", AttendanceMark::Unmarked),
    (2, "10:00 AM", "Physics", AttendanceMark::Present),
    (2, "11:00 AM", "English", AttendanceMark::Unmarked),
    (2, "1:00 PM", "Mathematics", AttendanceMark::Unmarked),
    (2, "2:00 PM", "Chemistry", AttendanceMark::Present),
    (3, "9:00 AM", "English", AttendanceMark::Present),
    (3, "10:00 AM", "Computer Science", AttendanceMark::Unmarked),
    (3, "11:00 AM", "Mathematics", AttendanceMark::Present),
    (3, "1:00 PM", "Physics", AttendanceMark::Unmarked),
    (4, "9:00 AM", "Computer Science", AttendanceMark::Unmarked),
    (4, "10:00 AM", "Chemistry", AttendanceMark::Unmarked),
    (4, "11:00 AM", "Chemistry", AttendanceMark::Absent),
    (4, "1:00 PM", "English", AttendanceMark::Unmarked),
    (4, "2:00 PM", "Physics", AttendanceMark::Absent),
    (5, "9:00 AM", "Physics", AttendanceMark::Unmarked),
    (5, "10:00 AM", "English", AttendanceMark::Present),
    (5, "11:00 AM", "Computer Science", AttendanceMark::Unmarked),
    (5, "1:00 PM", "Mathematics", AttendanceMark::Unmarked),
    (5, "3:00 PM", "Computer Science", AttendanceMark::Present),
];

/// (id, name, cached percentage, [(present, slot, weekday)])
type DemoSubject = (&'static str, &'static str, i32, [(bool, &'static str, u8); 2]);

const DEMO_SUBJECTS: [DemoSubject; 5] = [
    ("1", "Mathematics", 85, [(true, "9:00 AM", 1), (true, "11:00 AM", 3)]),
    ("2", "Physics", 70, [(true, "10:00 AM", 2), (false, "2:00 PM", 4)]),
    ("3", "Computer Science", 90, [(true, "1:00 PM", 1), (true, "3:00 PM", 5)]),
    ("4", "Chemistry", 75, [(true, "2:00 PM", 2), (false, "11:00 AM", 4)]),
    ("5", "English", 80, [(true, "9:00 AM", 3), (true, "10:00 AM", 5)]),
];

/// The demo subjects, every history record stamped with `now`
pub fn demo_subjects(now: DateTime<Utc>) -> Vec<Subject> {
    DEMO_SUBJECTS
        .iter()
        .map(|(id, name, percentage, records)| {
            let attendance = records
                .iter()
                .map(|&(present, slot, weekday)| AttendanceRecord {
                    present,
                    date: now,
                    time_slot: slot.to_string(),
                    weekday: Some(weekday),
                })
                .collect();
            Subject::new_with_fields(id.to_string(), name.to_string(), *percentage, attendance)
        })
        .collect()
}

/// A full week with the demo classes filled in
pub fn demo_week() -> Week {
    let mut week = default_week();
    for &(weekday, slot, subject, mark) in DEMO_CLASSES {
        // The table only uses schedule labels, so every id exists
        if let Ok(id) = CellId::new(weekday, slot) {
            if let Some(cell) = week.get_mut(&id.to_string()) {
                cell.subject_name = subject.to_string();
                cell.attendance_mark = mark;
            }
        }
    }
    week
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::count_classes;
    use crate::models::Timetable;

    #[test]
    fn test_demo_week_is_full_and_populated() {
        let week = demo_week();
        assert_eq!(week.len(), 45);
        assert_eq!(week.values().filter(|cell| !cell.subject_name.is_empty()).count(), DEMO_CLASSES.len());
        assert_eq!(week["day-4-11:00 AM"].attendance_mark, AttendanceMark::Absent);
    }

    #[test]
    fn test_demo_counts() {
        let timetable: Timetable = [("week-10-2025".to_string(), demo_week())].into();
        let chemistry = count_classes(&timetable, "Chemistry");
        assert_eq!(chemistry.total_scheduled(), 5);
        assert_eq!(chemistry.attended, 1);
        assert_eq!(chemistry.absent, 1);
    }

    #[test]
    fn test_demo_subjects() {
        let subjects = demo_subjects(Utc::now());
        assert_eq!(subjects.len(), 5);
        assert_eq!(subjects[1].get_name(), "Physics");
        assert!(subjects[1].is_critical());
        assert_eq!(subjects[0].get_attendance().len(), 2);
    }
}
