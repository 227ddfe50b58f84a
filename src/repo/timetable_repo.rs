use crate::db::{execute_with_retry, DbPool};
use crate::models::{Timetable, TimetableWeek, Week};
use crate::schema::timetable_weeks;
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Loads every stored week document
///
/// ### Returns
///
/// The stored weeks keyed by their raw week key. An empty database yields an
/// empty timetable.
#[instrument(skip(pool))]
pub fn load_timetable(pool: &DbPool) -> Result<Timetable> {
    debug!("Loading timetable");

    let conn = &mut pool.get()?;

    let rows = timetable_weeks::table
        .select(TimetableWeek::as_select())
        .load(conn)?;

    info!("Loaded {} timetable weeks", rows.len());
    Ok(rows.into_iter().map(TimetableWeek::into_parts).collect())
}

/// Inserts or replaces a single week document
#[instrument(skip(pool, cells), fields(week_key = %week_key, cells = cells.len()))]
pub async fn save_week(pool: &DbPool, week_key: &str, cells: &Week) -> Result<()> {
    debug!("Saving timetable week");

    let row = TimetableWeek::new(week_key.to_string(), cells.clone());
    let mut conn = pool.get()?;

    execute_with_retry(|| {
        diesel::replace_into(timetable_weeks::table)
            .values(&row)
            .execute(&mut conn)
    }).await?;

    Ok(())
}

/// Replaces the whole stored timetable with `timetable`
///
/// Week documents missing from `timetable` are deleted and every other week
/// is written, all inside one transaction.
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - Any write fails; the stored timetable is then left as it was
#[instrument(skip(pool, timetable), fields(weeks = timetable.len()))]
pub async fn save_timetable(pool: &DbPool, timetable: &Timetable) -> Result<()> {
    debug!("Saving full timetable");

    let rows: Vec<TimetableWeek> = timetable
        .iter()
        .map(|(key, week)| TimetableWeek::new(key.clone(), week.clone()))
        .collect();
    let keys: Vec<&str> = rows.iter().map(|row| row.get_week_key()).collect();
    let mut conn = pool.get()?;

    execute_with_retry(|| {
        conn.transaction(|conn| {
            let removed = diesel::delete(
                timetable_weeks::table.filter(timetable_weeks::week_key.ne_all(keys.clone())),
            )
            .execute(conn)?;
            if removed > 0 {
                debug!("Removed {} stale weeks", removed);
            }

            for row in &rows {
                diesel::replace_into(timetable_weeks::table)
                    .values(row)
                    .execute(conn)?;
            }
            Ok(rows.len())
        })
    }).await?;

    info!("Saved {} timetable weeks", rows.len());
    Ok(())
}
