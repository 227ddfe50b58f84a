use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use super::{Week, WeekCells};

/// One stored week document
///
/// This struct maps directly to the `timetable_weeks` table. The week key is
/// kept as the raw string so stored keys survive a load/save cycle unchanged.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::timetable_weeks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TimetableWeek {
    week_key: String,
    cells: WeekCells,
    updated_at: NaiveDateTime,
}

impl TimetableWeek {
    pub fn new(week_key: String, cells: Week) -> Self {
        Self {
            week_key,
            cells: WeekCells(cells),
            updated_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_week_key(&self) -> &str {
        &self.week_key
    }

    pub fn into_parts(self) -> (String, Week) {
        (self.week_key, self.cells.0)
    }
}
