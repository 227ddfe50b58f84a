//! Commit step
//!
//! Folds the timetable into per-subject statistics and writes the touched
//! subjects and the full grid to storage. Writes are sequential; the first
//! failure stops the commit and nothing already written is undone.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::aggregator::rounded_percentage;
use crate::errors::CommitError;
use crate::models::{AttendanceMark, AttendanceRecord, CellId, Subject, Timetable, WeekKey};
use crate::registry::SubjectRegistry;
use crate::storage::Storage;

/// Per-subject totals gathered from one pass over the timetable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectTally {
    /// Non-holiday cells carrying the subject's name
    pub scheduled: u32,
    pub attended: u32,
    /// One record per held class, oldest first
    pub attendance: Vec<AttendanceRecord>,
}

impl SubjectTally {
    pub fn percentage(&self) -> i32 {
        rounded_percentage(self.attended, self.scheduled) as i32
    }
}

/// What a successful commit wrote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Names of subjects created by this commit
    pub created: Vec<String>,
    /// Names of existing subjects whose statistics were replaced
    pub updated: Vec<String>,
    /// Number of week documents written
    pub weeks: usize,
}

/// Splits a raw cell id into weekday and slot label without validating it
fn split_cell_id(cell_id: &str, fallback_weekday: u8) -> (u8, String) {
    if let Ok(id) = cell_id.parse::<CellId>() {
        return (id.weekday(), id.time_slot().to_string());
    }
    let slot = cell_id
        .strip_prefix("day-")
        .and_then(|rest| rest.split_once('-'))
        .map(|(_, slot)| slot)
        .unwrap_or(cell_id);
    (fallback_weekday, slot.to_string())
}

/// Midnight UTC of the given weekday in a week, if the key can be read
fn class_date(week_key: &str, weekday: u8) -> Option<DateTime<Utc>> {
    let key = week_key.parse::<WeekKey>().ok()?;
    let date = key.date_of(weekday)?;
    Some(date.and_time(NaiveTime::MIN).and_utc())
}

/// Buckets every scheduled class by subject name
///
/// Holiday cells and unassigned cells are skipped. Unmarked classes count
/// toward `scheduled` but produce no attendance record.
pub fn tally_timetable(timetable: &Timetable) -> BTreeMap<String, SubjectTally> {
    let mut tallies: BTreeMap<String, SubjectTally> = BTreeMap::new();

    for (week_key, week) in timetable {
        for (cell_id, cell) in week {
            if cell.is_holiday || cell.subject_name.is_empty() {
                continue;
            }

            let tally = tallies.entry(cell.subject_name.clone()).or_default();
            tally.scheduled += 1;

            let present = match cell.attendance_mark {
                AttendanceMark::Present => true,
                AttendanceMark::Absent => false,
                AttendanceMark::Unmarked => continue,
            };
            if present {
                tally.attended += 1;
            }

            let (weekday, time_slot) = split_cell_id(cell_id, cell.weekday);
            match class_date(week_key, weekday) {
                Some(date) => tally.attendance.push(AttendanceRecord {
                    present,
                    date,
                    time_slot,
                    weekday: Some(weekday),
                }),
                None => warn!("Skipping attendance record for {} in unreadable week {}", cell_id, week_key),
            }
        }
    }

    for tally in tallies.values_mut() {
        tally.attendance.sort_by_key(|record| record.date);
    }
    tallies
}

/// Applies fresh tallies to the registered subjects
///
/// Returns the subjects to write, each paired with whether it is new. An
/// existing subject (matched by name) keeps its id and gets its percentage
/// and attendance replaced; an unseen name gets a new subject.
pub fn reconcile(registry: &SubjectRegistry, tallies: BTreeMap<String, SubjectTally>) -> Vec<(Subject, bool)> {
    tallies
        .into_iter()
        .map(|(name, tally)| {
            let percentage = tally.percentage();
            match registry.get_by_name(&name) {
                Some(existing) => {
                    let mut subject = existing.clone();
                    subject.set_percentage(percentage);
                    subject.set_attendance(tally.attendance);
                    (subject, false)
                }
                None => (
                    Subject::new_with_fields(Uuid::new_v4().to_string(), name, percentage, tally.attendance),
                    true,
                ),
            }
        })
        .collect()
}

/// Recomputes every subject from the timetable and persists the result
///
/// Subjects are written one at a time and the registry is updated after each
/// successful write, so it always mirrors what storage holds. The full
/// timetable is written last.
///
/// ### Errors
///
/// Returns the first failed write as a `CommitError`. Earlier writes stay.
#[instrument(skip_all, fields(weeks = timetable.len()))]
pub async fn commit_timetable<S: Storage>(
    store: &S,
    registry: &mut SubjectRegistry,
    timetable: &Timetable,
) -> Result<CommitSummary, CommitError> {
    let tallies = tally_timetable(timetable);
    debug!("Tallied {} subjects", tallies.len());

    let mut summary = CommitSummary::default();

    for (subject, created) in reconcile(registry, tallies) {
        let name = subject.get_name();
        store
            .save_subject(&subject)
            .await
            .map_err(|source| CommitError::SubjectWrite { name: name.clone(), source })?;
        registry.upsert(subject);

        if created {
            summary.created.push(name);
        } else {
            summary.updated.push(name);
        }
    }

    store
        .save_timetable(timetable)
        .await
        .map_err(CommitError::TimetableWrite)?;
    summary.weeks = timetable.len();

    info!(
        "Committed timetable: {} subjects created, {} updated, {} weeks",
        summary.created.len(),
        summary.updated.len(),
        summary.weeks
    );
    Ok(summary)
}
