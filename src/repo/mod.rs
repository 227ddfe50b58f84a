/// Repository module
///
/// This module provides the data access layer for the application.
/// It contains functions for reading and writing subject documents and
/// timetable week documents.
///
/// Handlers never call these functions directly; they go through the
/// `Storage` trait so the sync logic can be exercised without a database.

mod subject_repo;
mod timetable_repo;

// Re-export all repository functions
pub use subject_repo::*;
pub use timetable_repo::*;
