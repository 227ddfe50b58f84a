//! Application state shared by every handler
//!
//! Owns the timetable grid and the subject registry behind async mutexes.
//! When both are needed the grid is locked first, then the registry, then
//! the persister's write gate.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::aggregator::{average_attendance, calculate_attendance_goal, is_subject_critical, subject_goal};
use crate::demo::{demo_subjects, demo_week};
use crate::dto::{CreateSubjectDto, DashboardDto, DemoSummaryDto, SubjectSummaryDto, UpdateSubjectDto};
use crate::errors::{ApiError, CommitError};
use crate::grid::{backfill_week, validate_timetable, validate_week, MarkOutcome, TimetableGrid};
use crate::models::{AttendanceGoal, Cell, CellId, CellPatch, Subject, Timetable, Week, WeekKey};
use crate::persist::DebouncedPersister;
use crate::registry::SubjectRegistry;
use crate::storage::{SqliteStorage, Storage};
use crate::sync::{commit_timetable, CommitSummary};

pub struct AppState<S: Storage + Clone + 'static = SqliteStorage> {
    store: S,
    grid: Mutex<TimetableGrid>,
    registry: Mutex<SubjectRegistry>,
    persister: DebouncedPersister<S>,
    default_target: f64,
}

impl<S: Storage + Clone + 'static> AppState<S> {
    /// Loads subjects and timetable once and starts the debounced persister
    ///
    /// A failed read is logged and replaced by an empty collection, so the
    /// server still starts when storage is unavailable.
    pub async fn load(store: S, persist_debounce: Duration, default_target: f64) -> Self {
        let subjects = store.load_subjects().await.unwrap_or_else(|err| {
            error!("Failed to load subjects, starting empty: {:#}", err);
            Vec::new()
        });
        let timetable = store.load_timetable().await.unwrap_or_else(|err| {
            error!("Failed to load timetable, starting empty: {:#}", err);
            Timetable::new()
        });
        info!("Loaded {} subjects and {} timetable weeks", subjects.len(), timetable.len());

        let persister = DebouncedPersister::spawn(store.clone(), persist_debounce);
        Self {
            store,
            grid: Mutex::new(TimetableGrid::from_timetable(timetable)),
            registry: Mutex::new(SubjectRegistry::new(subjects)),
            persister,
            default_target,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the requested target, or the configured default
    pub fn resolve_target(&self, requested: Option<f64>) -> Result<f64, ApiError> {
        match requested {
            None => Ok(self.default_target),
            Some(target) if (0.0..=100.0).contains(&target) => Ok(target),
            Some(target) => Err(ApiError::InvalidTarget(format!(
                "Target percentage must be between 0 and 100, got {}",
                target
            ))),
        }
    }

    // ── Subjects ─────────────────────────────────────────────────────

    pub async fn list_subjects(&self) -> Vec<Subject> {
        self.registry.lock().await.all().to_vec()
    }

    pub async fn get_subject(&self, id: &str) -> Option<Subject> {
        self.registry.lock().await.get_by_id(id).cloned()
    }

    pub async fn get_subject_by_name(&self, name: &str) -> Option<Subject> {
        self.registry.lock().await.get_by_name(name).cloned()
    }

    /// Creates or replaces a subject; written to storage before it is applied
    #[instrument(skip(self, dto), fields(name = %dto.name))]
    pub async fn add_subject(&self, dto: CreateSubjectDto) -> Result<Subject> {
        let id = dto.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let subject = Subject::new_with_fields(id, dto.name, dto.percentage, dto.attendance);

        let mut registry = self.registry.lock().await;
        self.store.save_subject(&subject).await?;
        registry.upsert(subject.clone());

        debug!("Registry now holds {} subjects", registry.len());
        Ok(subject)
    }

    /// Merges a partial update into a subject
    ///
    /// Returns `Ok(None)` when no subject has that id.
    #[instrument(skip(self, dto))]
    pub async fn update_subject(&self, id: &str, dto: UpdateSubjectDto) -> Result<Option<Subject>> {
        let mut registry = self.registry.lock().await;
        let Some(mut subject) = registry.get_by_id(id).cloned() else {
            return Ok(None);
        };

        if let Some(name) = dto.name {
            subject.set_name(name);
        }
        if let Some(percentage) = dto.percentage {
            subject.set_percentage(percentage);
        }
        if let Some(attendance) = dto.attendance {
            subject.set_attendance(attendance);
        }

        self.store.save_subject(&subject).await?;
        registry.upsert(subject.clone());
        Ok(Some(subject))
    }

    /// Deletes a subject from storage and the registry
    #[instrument(skip(self))]
    pub async fn delete_subject(&self, id: &str) -> Result<bool> {
        let mut registry = self.registry.lock().await;
        let stored = self.store.delete_subject(id).await?;
        let registered = registry.remove(id).is_some();
        Ok(stored || registered)
    }

    // ── Goals ────────────────────────────────────────────────────────

    /// Goal projection for a registered subject; `None` for an unknown id
    pub async fn goal_for_subject(&self, id: &str, target: f64) -> Option<AttendanceGoal> {
        let grid = self.grid.lock().await;
        let registry = self.registry.lock().await;
        let subject = registry.get_by_id(id)?;
        Some(subject_goal(grid.timetable(), subject, target))
    }

    /// Goal projection for any name, registered or not
    pub async fn goal_for_name(&self, name: &str, target: f64) -> AttendanceGoal {
        let grid = self.grid.lock().await;
        calculate_attendance_goal(grid.timetable(), name, target)
    }

    pub async fn dashboard(&self, target: f64) -> DashboardDto {
        let grid = self.grid.lock().await;
        let registry = self.registry.lock().await;

        let subjects = registry
            .all()
            .iter()
            .map(|subject| SubjectSummaryDto {
                subject: subject.clone(),
                is_critical: is_subject_critical(subject),
                goal: subject_goal(grid.timetable(), subject, target),
            })
            .collect();

        DashboardDto {
            average_attendance: average_attendance(registry.all()),
            target_percentage: target,
            subjects,
        }
    }

    // ── Timetable ────────────────────────────────────────────────────

    pub async fn timetable(&self) -> Timetable {
        self.grid.lock().await.snapshot()
    }

    /// The stored week, or a fresh default week
    pub async fn week(&self, week_key: &WeekKey) -> Week {
        self.grid.lock().await.get_or_init_week(week_key).clone()
    }

    /// Hands the current grid to the debounced persister
    fn schedule_persist(&self, grid: &TimetableGrid) {
        self.persister.schedule(grid.snapshot());
    }

    pub async fn set_cell(&self, week_key: &WeekKey, cell_id: &CellId, patch: CellPatch) -> Cell {
        let mut grid = self.grid.lock().await;
        let cell = grid.set_cell(week_key, cell_id, patch).clone();
        self.schedule_persist(&grid);
        cell
    }

    pub async fn toggle_holiday(&self, week_key: &WeekKey, cell_id: &CellId) -> Cell {
        let mut grid = self.grid.lock().await;
        let cell = grid.toggle_holiday(week_key, cell_id).clone();
        self.schedule_persist(&grid);
        cell
    }

    pub async fn mark_attendance(&self, week_key: &WeekKey, cell_id: &CellId, present: bool) -> (Cell, MarkOutcome) {
        let mut grid = self.grid.lock().await;
        let outcome = grid.mark_attendance(week_key, cell_id, present);
        if outcome == MarkOutcome::Applied {
            self.schedule_persist(&grid);
        }
        let cell = grid.cell(week_key, cell_id).cloned().unwrap_or_else(|| Cell::new(cell_id.weekday()));
        (cell, outcome)
    }

    /// Replaces the whole grid; written to storage before it is applied
    ///
    /// Rejects week keys and cells that are not part of the schedule.
    #[instrument(skip(self, timetable), fields(weeks = timetable.len()))]
    pub async fn replace_timetable(&self, timetable: Timetable) -> Result<Timetable, ApiError> {
        validate_timetable(&timetable)?;

        let mut grid = self.grid.lock().await;
        let _gate = self.persister.lock_writes().await;
        self.store.save_timetable(&timetable).await?;
        self.persister.discard_pending();
        grid.replace(timetable);
        Ok(grid.snapshot())
    }

    /// Replaces one week; written to storage before it is applied
    #[instrument(skip(self, week))]
    pub async fn replace_week(&self, week_key: &WeekKey, mut week: Week) -> Result<Week, ApiError> {
        validate_week(&week)?;
        backfill_week(&mut week);

        let mut grid = self.grid.lock().await;
        let _gate = self.persister.lock_writes().await;
        self.store.save_week(&week_key.to_string(), &week).await?;
        grid.insert_week(week_key, week.clone());

        // A pending snapshot predates this week and would overwrite it
        if self.persister.has_pending() {
            self.schedule_persist(&grid);
        }
        Ok(week)
    }

    /// Folds the grid into the subjects and writes everything
    pub async fn commit(&self) -> Result<CommitSummary, CommitError> {
        let grid = self.grid.lock().await;
        let mut registry = self.registry.lock().await;
        let _gate = self.persister.lock_writes().await;

        // The grid is locked, so nothing pending is newer than what is written here
        self.persister.discard_pending();
        let result = commit_timetable(&self.store, &mut registry, grid.timetable()).await;
        if result.is_err() {
            // Keep unsaved edits queued
            self.schedule_persist(&grid);
        }
        result
    }

    /// Writes the demo subjects and a populated week for `now`
    #[instrument(skip(self))]
    pub async fn load_demo(&self, now: DateTime<Utc>) -> Result<DemoSummaryDto> {
        let week_key = WeekKey::containing(now.date_naive());
        let subjects = demo_subjects(now);
        let timetable: Timetable = [(week_key.to_string(), demo_week())].into();

        let mut grid = self.grid.lock().await;
        let mut registry = self.registry.lock().await;
        let _gate = self.persister.lock_writes().await;

        for subject in &subjects {
            self.store.save_subject(subject).await?;
            registry.upsert(subject.clone());
        }
        self.store.save_timetable(&timetable).await?;
        self.persister.discard_pending();
        grid.replace(timetable);

        info!("Loaded demo data for {}", week_key);
        Ok(DemoSummaryDto { subjects: subjects.len(), week_key: week_key.to_string() })
    }

    /// Writes any pending grid snapshot and stops the persister
    pub async fn shutdown(&self) -> Result<bool> {
        let _grid = self.grid.lock().await;
        self.persister.shutdown().await
    }
}
