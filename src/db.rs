use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{Error as DieselError, QueryResult};
use diesel::sqlite::SqliteConnection;
use std::time::Duration;
use tracing::warn;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Number of times a write is retried while SQLite reports the database as locked
const MAX_RETRIES: u32 = 5;

/// Base delay between retries, multiplied by the attempt number
const RETRY_DELAY: Duration = Duration::from_millis(50);

pub fn init_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder().build(manager).expect("Failed to create pool.")
}

/// Runs a database operation, retrying it while SQLite reports `database is locked`
///
/// The shared-cache in-memory databases used in tests and concurrent writers on
/// a file database both surface lock contention as a plain database error, so
/// the operation is retried with a linear backoff before the error is returned.
///
/// ### Arguments
///
/// * `op` - The operation to run; it is called once per attempt
///
/// ### Returns
///
/// The result of the first attempt that did not fail with a lock error
pub async fn execute_with_retry<T, F>(mut op: F) -> QueryResult<T>
where
    F: FnMut() -> QueryResult<T>,
{
    let mut attempt = 0;
    loop {
        match op() {
            Err(err) if is_locked(&err) && attempt < MAX_RETRIES => {
                attempt += 1;
                warn!("Database is locked, retrying (attempt {}/{})", attempt, MAX_RETRIES);
                tokio::time::sleep(RETRY_DELAY * attempt).await;
            }
            result => return result,
        }
    }
}

fn is_locked(err: &DieselError) -> bool {
    matches!(err, DieselError::DatabaseError(_, info) if info.message().contains("database is locked"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorKind;

    fn locked_error() -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("database is locked".to_string()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_unlocked() {
        let mut calls = 0;
        let result = execute_with_retry(|| {
            calls += 1;
            if calls < 3 { Err(locked_error()) } else { Ok(calls) }
        }).await;

        assert_eq!(result.unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let mut calls = 0;
        let result: QueryResult<()> = execute_with_retry(|| {
            calls += 1;
            Err(locked_error())
        }).await;

        assert!(result.is_err());
        assert_eq!(calls, MAX_RETRIES + 1);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let mut calls = 0;
        let result: QueryResult<()> = execute_with_retry(|| {
            calls += 1;
            Err(DieselError::NotFound)
        }).await;

        assert!(matches!(result, Err(DieselError::NotFound)));
        assert_eq!(calls, 1);
    }
}
