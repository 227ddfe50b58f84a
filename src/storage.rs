//! Storage seam between the in-memory state and the database
//!
//! The sync step and the debounced persister only see this trait, so they can
//! be driven by an in-memory double in tests.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;

use crate::db::DbPool;
use crate::models::{Subject, Timetable, Week};
use crate::repo;

/// Document storage for subjects and timetable weeks
pub trait Storage: Send + Sync {
    /// Reads every subject document
    fn load_subjects(&self) -> impl Future<Output = Result<Vec<Subject>>> + Send;

    fn get_subject(&self, id: &str) -> impl Future<Output = Result<Option<Subject>>> + Send;

    /// Writes a subject document, replacing any with the same id
    fn save_subject(&self, subject: &Subject) -> impl Future<Output = Result<()>> + Send;

    /// Deletes a subject document; `false` if none had that id
    fn delete_subject(&self, id: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Reads every week document
    fn load_timetable(&self) -> impl Future<Output = Result<Timetable>> + Send;

    /// Writes one week document
    fn save_week(&self, week_key: &str, cells: &Week) -> impl Future<Output = Result<()>> + Send;

    /// Replaces every week document with the given timetable
    fn save_timetable(&self, timetable: &Timetable) -> impl Future<Output = Result<()>> + Send;
}

/// `Storage` backed by the SQLite pool
#[derive(Clone)]
pub struct SqliteStorage {
    pool: Arc<DbPool>,
}

impl SqliteStorage {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Storage for SqliteStorage {
    async fn load_subjects(&self) -> Result<Vec<Subject>> {
        repo::list_subjects(&self.pool)
    }

    async fn get_subject(&self, id: &str) -> Result<Option<Subject>> {
        repo::get_subject(&self.pool, id)
    }

    async fn save_subject(&self, subject: &Subject) -> Result<()> {
        repo::save_subject(&self.pool, subject).await
    }

    async fn delete_subject(&self, id: &str) -> Result<bool> {
        repo::delete_subject(&self.pool, id).await
    }

    async fn load_timetable(&self) -> Result<Timetable> {
        repo::load_timetable(&self.pool)
    }

    async fn save_week(&self, week_key: &str, cells: &Week) -> Result<()> {
        repo::save_week(&self.pool, week_key, cells).await
    }

    async fn save_timetable(&self, timetable: &Timetable) -> Result<()> {
        repo::save_timetable(&self.pool, timetable).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::default_week;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_sqlite_storage_delegates_to_repo() {
        let store = SqliteStorage::new(setup_test_db());

        let subject = Subject::new("Biology".to_string());
        store.save_subject(&subject).await.unwrap();
        assert_eq!(store.get_subject(&subject.get_id()).await.unwrap(), Some(subject.clone()));
        assert_eq!(store.load_subjects().await.unwrap(), vec![subject.clone()]);

        store.save_week("week-10-2025", &default_week()).await.unwrap();
        assert_eq!(store.load_timetable().await.unwrap().len(), 1);

        assert!(store.delete_subject(&subject.get_id()).await.unwrap());
        assert!(store.load_subjects().await.unwrap().is_empty());
    }
}
