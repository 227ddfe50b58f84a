//! Timetable grid
//!
//! Owns the sparse week -> cell mapping edited by the presentation layer.
//! Weeks are materialized lazily and always with the full set of schedule
//! cells; cells are only ever merged into, never removed.

use tracing::debug;

use crate::errors::GridError;
use crate::models::{AttendanceMark, Cell, CellId, CellPatch, Timetable, Week, WeekKey};

/// Result of a `mark_attendance` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The mark was written
    Applied,
    /// The cell is a holiday; nothing changed
    Holiday,
}

/// In-memory timetable grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableGrid {
    weeks: Timetable,
}

/// Builds a week with every schedule cell in its default state
pub fn default_week() -> Week {
    CellId::all()
        .map(|id| (id.to_string(), Cell::new(id.weekday())))
        .collect()
}

/// Adds any schedule cell missing from `week`, leaving existing cells alone
pub fn backfill_week(week: &mut Week) {
    for id in CellId::all() {
        week.entry(id.to_string()).or_insert_with(|| Cell::new(id.weekday()));
    }
}

/// Checks that every cell of an incoming week is a schedule cell
///
/// Each id must parse as a `CellId` and the cell's `weekday` must match it.
pub fn validate_week(week: &Week) -> Result<(), GridError> {
    for (raw_id, cell) in week {
        let id: CellId = raw_id.parse()?;
        if cell.weekday != id.weekday() {
            return Err(GridError::WeekdayMismatch {
                cell_id: raw_id.clone(),
                expected: id.weekday(),
                found: cell.weekday,
            });
        }
    }
    Ok(())
}

/// Checks every week key and week of an incoming timetable
pub fn validate_timetable(timetable: &Timetable) -> Result<(), GridError> {
    for (week_key, week) in timetable {
        week_key.parse::<WeekKey>()?;
        validate_week(week)?;
    }
    Ok(())
}

impl TimetableGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a grid from stored weeks, back-filling any missing schedule cells
    ///
    /// Cells whose id is not part of the schedule are kept as they are.
    pub fn from_timetable(mut weeks: Timetable) -> Self {
        for week in weeks.values_mut() {
            backfill_week(week);
        }
        Self { weeks }
    }

    pub fn timetable(&self) -> &Timetable {
        &self.weeks
    }

    /// Returns a copy of the whole grid, as handed to storage
    pub fn snapshot(&self) -> Timetable {
        self.weeks.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn week(&self, week_key: &WeekKey) -> Option<&Week> {
        self.weeks.get(&week_key.to_string())
    }

    pub fn cell(&self, week_key: &WeekKey, cell_id: &CellId) -> Option<&Cell> {
        self.week(week_key)?.get(&cell_id.to_string())
    }

    /// Returns the stored week, or creates it with every cell defaulted
    pub fn get_or_init_week(&mut self, week_key: &WeekKey) -> &Week {
        self.week_mut(week_key)
    }

    fn week_mut(&mut self, week_key: &WeekKey) -> &mut Week {
        self.weeks.entry(week_key.to_string()).or_insert_with(|| {
            debug!("Initializing week {}", week_key);
            default_week()
        })
    }

    fn cell_mut(&mut self, week_key: &WeekKey, cell_id: &CellId) -> &mut Cell {
        self.week_mut(week_key)
            .entry(cell_id.to_string())
            .or_insert_with(|| Cell::new(cell_id.weekday()))
    }

    /// Merges `patch` into a cell, creating the week and cell first when absent
    pub fn set_cell(&mut self, week_key: &WeekKey, cell_id: &CellId, patch: CellPatch) -> &Cell {
        let cell = self.cell_mut(week_key, cell_id);
        patch.apply(cell);
        cell
    }

    /// Flips the holiday flag, keeping the subject name and mark underneath
    pub fn toggle_holiday(&mut self, week_key: &WeekKey, cell_id: &CellId) -> &Cell {
        let cell = self.cell_mut(week_key, cell_id);
        cell.is_holiday = !cell.is_holiday;
        cell
    }

    /// Marks a class present or absent; holiday cells are left unchanged
    pub fn mark_attendance(&mut self, week_key: &WeekKey, cell_id: &CellId, present: bool) -> MarkOutcome {
        let cell = self.cell_mut(week_key, cell_id);
        if cell.is_holiday {
            debug!("Ignoring attendance mark on holiday cell {} of {}", cell_id, week_key);
            return MarkOutcome::Holiday;
        }
        cell.attendance_mark = AttendanceMark::from_present(present);
        MarkOutcome::Applied
    }

    /// Stores a whole week, back-filling any missing schedule cells
    pub fn insert_week(&mut self, week_key: &WeekKey, mut week: Week) -> &Week {
        backfill_week(&mut week);
        let key = week_key.to_string();
        self.weeks.insert(key.clone(), week);
        &self.weeks[&key]
    }

    /// Replaces every week at once
    pub fn replace(&mut self, weeks: Timetable) {
        *self = Self::from_timetable(weeks);
    }
}
