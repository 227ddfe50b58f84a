use crate::*;
use crate::grid::TimetableGrid;
use crate::models::{AttendanceMark, CellId, CellPatch, Subject, Timetable, Week, WeekKey};
use crate::storage::Storage;
use anyhow::{anyhow, Result};
use diesel::connection::SimpleConnection;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Sets up a test database with migrations applied
///
/// This function:
/// 1. Creates an in-memory SQLite database
/// 2. Runs all migrations to set up the schema
///
/// ### Returns
///
/// An Arc-wrapped database connection pool connected to the in-memory database
pub fn setup_test_db() -> Arc<db::DbPool> {
    // Use a unique shared in-memory database for each test.
    // Plain ":memory:" gives each connection its own separate database,
    // so migrations run on one connection wouldn't be visible on others.
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url);

    let mut conn = pool.get().expect("Failed to get connection");
    conn.batch_execute("PRAGMA busy_timeout = 1000").unwrap();
    run_migrations(&mut conn);

    Arc::new(pool)
}

/// Sets up application state over a fresh test database
///
/// The debounce window is long enough that no background write happens
/// during a test unless the test waits for it.
pub async fn setup_test_state() -> Arc<crate::state::AppState> {
    let store = crate::storage::SqliteStorage::new(setup_test_db());
    Arc::new(crate::state::AppState::load(store, std::time::Duration::from_secs(60), 75.0).await)
}

/// Week 10 of 2025 when `week` is 10, and so on
pub fn week_key(week: u32) -> WeekKey {
    WeekKey::new(week, 2025).unwrap()
}

/// `present` Present marks, then `absent` Absent marks, then `unmarked` Unmarked
pub fn marks(present: usize, absent: usize, unmarked: usize) -> Vec<AttendanceMark> {
    std::iter::repeat_n(AttendanceMark::Present, present)
        .chain(std::iter::repeat_n(AttendanceMark::Absent, absent))
        .chain(std::iter::repeat_n(AttendanceMark::Unmarked, unmarked))
        .collect()
}

/// Assigns `subject` to the first unassigned cells of a week, one per mark
///
/// Panics when the week runs out of free cells.
pub fn add_classes(grid: &mut TimetableGrid, week_key: &WeekKey, subject: &str, marks: &[AttendanceMark]) {
    let week = grid.get_or_init_week(week_key);
    let free: Vec<CellId> = CellId::all()
        .filter(|id| week[&id.to_string()].subject_name.is_empty())
        .take(marks.len())
        .collect();
    assert_eq!(free.len(), marks.len(), "not enough free cells in {}", week_key);

    for (id, mark) in free.iter().zip(marks) {
        grid.set_cell(week_key, id, CellPatch {
            subject_name: Some(subject.to_string()),
            attendance_mark: Some(*mark),
            ..Default::default()
        });
    }
}

/// Generates an arbitrary attendance mark
pub fn arb_mark() -> impl Strategy<Value = AttendanceMark> {
    prop_oneof![
        Just(AttendanceMark::Present),
        Just(AttendanceMark::Absent),
        Just(AttendanceMark::Unmarked),
    ]
}

/// Every write a `RecordingStorage` received, in order
#[derive(Debug, Default)]
pub struct Writes {
    pub subjects: Vec<Subject>,
    pub weeks: Vec<(String, Week)>,
    pub timetables: Vec<Timetable>,
}

/// In-memory storage that records writes and can be told to fail
///
/// `fail_subject_after` lets the first N subject writes succeed and fails the
/// rest; `fail_timetable` fails every timetable write. `first_timetable_delay`
/// holds back only the first timetable write, which is recorded once the
/// delay is over.
#[derive(Debug, Clone, Default)]
pub struct RecordingStorage {
    pub writes: Arc<Mutex<Writes>>,
    pub subjects: Arc<Mutex<Vec<Subject>>>,
    pub timetable: Arc<Mutex<Timetable>>,
    pub fail_subject_after: Option<usize>,
    pub fail_timetable: bool,
    pub fail_reads: bool,
    pub first_timetable_delay: Option<Duration>,
    pub timetable_attempts: Arc<AtomicUsize>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved_timetables(&self) -> Vec<Timetable> {
        self.writes.lock().unwrap().timetables.clone()
    }

    pub fn saved_subjects(&self) -> Vec<Subject> {
        self.writes.lock().unwrap().subjects.clone()
    }
}

impl Storage for RecordingStorage {
    async fn load_subjects(&self) -> Result<Vec<Subject>> {
        if self.fail_reads {
            return Err(anyhow!("storage offline"));
        }
        Ok(self.subjects.lock().unwrap().clone())
    }

    async fn get_subject(&self, id: &str) -> Result<Option<Subject>> {
        Ok(self.subjects.lock().unwrap().iter().find(|s| s.get_id() == id).cloned())
    }

    async fn save_subject(&self, subject: &Subject) -> Result<()> {
        let mut writes = self.writes.lock().unwrap();
        if let Some(limit) = self.fail_subject_after {
            if writes.subjects.len() >= limit {
                return Err(anyhow!("write rejected for {}", subject.get_name()));
            }
        }
        writes.subjects.push(subject.clone());
        let mut subjects = self.subjects.lock().unwrap();
        subjects.retain(|s| s.get_id() != subject.get_id());
        subjects.push(subject.clone());
        Ok(())
    }

    async fn delete_subject(&self, id: &str) -> Result<bool> {
        let mut subjects = self.subjects.lock().unwrap();
        let before = subjects.len();
        subjects.retain(|s| s.get_id() != id);
        Ok(subjects.len() != before)
    }

    async fn load_timetable(&self) -> Result<Timetable> {
        if self.fail_reads {
            return Err(anyhow!("storage offline"));
        }
        Ok(self.timetable.lock().unwrap().clone())
    }

    async fn save_week(&self, week_key: &str, cells: &Week) -> Result<()> {
        self.writes.lock().unwrap().weeks.push((week_key.to_string(), cells.clone()));
        self.timetable.lock().unwrap().insert(week_key.to_string(), cells.clone());
        Ok(())
    }

    async fn save_timetable(&self, timetable: &Timetable) -> Result<()> {
        let attempt = self.timetable_attempts.fetch_add(1, Ordering::SeqCst);
        if let (0, Some(delay)) = (attempt, self.first_timetable_delay) {
            tokio::time::sleep(delay).await;
        }
        if self.fail_timetable {
            return Err(anyhow!("timetable write rejected"));
        }
        self.writes.lock().unwrap().timetables.push(timetable.clone());
        *self.timetable.lock().unwrap() = timetable.clone();
        Ok(())
    }
}
