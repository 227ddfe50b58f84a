use crate::db::{execute_with_retry, DbPool};
use crate::models::Subject;
use crate::schema::subjects;
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Inserts or replaces a subject document
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `subject` - The subject to store; an existing row with the same id is replaced
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database write fails
#[instrument(skip(pool, subject), fields(subject_id = %subject.get_id(), name = %subject.get_name()))]
pub async fn save_subject(pool: &DbPool, subject: &Subject) -> Result<()> {
    debug!("Saving subject");

    let mut conn = pool.get()?;

    execute_with_retry(|| {
        diesel::replace_into(subjects::table)
            .values(subject)
            .execute(&mut conn)
    }).await?;

    info!("Saved subject with {} attendance records", subject.get_attendance().len());
    Ok(())
}

/// Retrieves a subject by its ID
///
/// ### Returns
///
/// A Result containing an Option with the Subject if found, or None if not found
#[instrument(skip(pool), fields(subject_id = %id))]
pub fn get_subject(pool: &DbPool, id: &str) -> Result<Option<Subject>> {
    debug!("Retrieving subject by id");

    let conn = &mut pool.get()?;

    let result = subjects::table
        .find(id)
        .select(Subject::as_select())
        .first(conn)
        .optional()?;

    if result.is_some() {
        debug!("Subject found");
    } else {
        debug!("Subject not found");
    }

    Ok(result)
}

/// Retrieves all subjects ordered by name
#[instrument(skip(pool))]
pub fn list_subjects(pool: &DbPool) -> Result<Vec<Subject>> {
    debug!("Listing all subjects");

    let conn = &mut pool.get()?;

    let result = subjects::table
        .order((subjects::name.asc(), subjects::id.asc()))
        .select(Subject::as_select())
        .load(conn)?;

    info!("Retrieved {} subjects", result.len());
    Ok(result)
}

/// Deletes a subject by its ID
///
/// ### Returns
///
/// `true` if a row was deleted, `false` if no subject had that id
#[instrument(skip(pool), fields(subject_id = %id))]
pub async fn delete_subject(pool: &DbPool, id: &str) -> Result<bool> {
    debug!("Deleting subject");

    let mut conn = pool.get()?;

    let deleted = execute_with_retry(|| {
        diesel::delete(subjects::table.find(id)).execute(&mut conn)
    }).await?;

    info!("Deleted {} subject rows", deleted);
    Ok(deleted > 0)
}
