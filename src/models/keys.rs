use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::GridError;

/// The fixed daily schedule, in display order
///
/// These labels are part of every cell id and must be kept byte-for-byte.
pub const TIME_SLOTS: [&str; 9] = [
    "9:00 AM", "10:00 AM", "11:00 AM", "12:00 PM", "1:00 PM",
    "2:00 PM", "3:00 PM", "4:00 PM", "5:00 PM",
];

/// Weekday numbers that carry cells (Monday to Friday)
pub const WEEKDAYS: [u8; 5] = [1, 2, 3, 4, 5];

/// Identifies one stored week, formatted as `week-<number>-<yyyy>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeekKey {
    pub week: u32,
    pub year: i32,
}

impl WeekKey {
    pub fn new(week: u32, year: i32) -> Result<Self, GridError> {
        if !(1..=53).contains(&week) || !(0..=9999).contains(&year) {
            return Err(GridError::InvalidWeekKey(format!("week-{}-{}", week, year)));
        }
        Ok(Self { week, year })
    }

    /// Returns the key of the ISO week containing `date`
    ///
    /// Weeks run Monday to Sunday, so a Sunday shares the key of the Monday
    /// before it.
    pub fn containing(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self { week: iso.week(), year: iso.year() }
    }

    /// Reconstructs the calendar date of `weekday` (1 = Monday) in this week
    ///
    /// Uses the ISO week date when it exists. Week 53 of a 52-week year has
    /// no ISO date, so the plain day offset from January 1st is used instead.
    pub fn date_of(&self, weekday: u8) -> Option<NaiveDate> {
        let iso_weekday = chrono::Weekday::try_from(weekday.checked_sub(1)?).ok()?;
        NaiveDate::from_isoywd_opt(self.year, self.week, iso_weekday).or_else(|| {
            let jan_first = NaiveDate::from_ymd_opt(self.year, 1, 1)?;
            let offset = (i64::from(self.week) - 1) * 7 + i64::from(weekday) - 1;
            jan_first.checked_add_signed(Duration::days(offset))
        })
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week-{}-{:04}", self.week, self.year)
    }
}

impl FromStr for WeekKey {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GridError::InvalidWeekKey(s.to_string());
        let rest = s.strip_prefix("week-").ok_or_else(invalid)?;
        let (week, year) = rest.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 {
            return Err(invalid());
        }
        let week = week.parse::<u32>().map_err(|_| invalid())?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        Self::new(week, year).map_err(|_| invalid())
    }
}

/// Identifies one cell inside a week, formatted as `day-<weekday>-<slot label>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId {
    weekday: u8,
    slot: usize,
}

impl CellId {
    pub fn new(weekday: u8, time_slot: &str) -> Result<Self, GridError> {
        if !WEEKDAYS.contains(&weekday) {
            return Err(GridError::InvalidWeekday(weekday));
        }
        let slot = TIME_SLOTS
            .iter()
            .position(|label| *label == time_slot)
            .ok_or_else(|| GridError::UnknownTimeSlot(time_slot.to_string()))?;
        Ok(Self { weekday, slot })
    }

    pub fn weekday(&self) -> u8 {
        self.weekday
    }

    pub fn time_slot(&self) -> &'static str {
        TIME_SLOTS[self.slot]
    }

    /// Every cell id of a full week, Monday first, slots in schedule order
    pub fn all() -> impl Iterator<Item = CellId> {
        WEEKDAYS
            .iter()
            .flat_map(|&weekday| (0..TIME_SLOTS.len()).map(move |slot| CellId { weekday, slot }))
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day-{}-{}", self.weekday, self.time_slot())
    }
}

impl FromStr for CellId {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GridError::InvalidCellId(s.to_string());
        let rest = s.strip_prefix("day-").ok_or_else(invalid)?;
        let (weekday, slot) = rest.split_once('-').ok_or_else(invalid)?;
        let weekday = weekday.parse::<u8>().map_err(|_| invalid())?;
        Self::new(weekday, slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_key_format_roundtrip() {
        let key: WeekKey = "week-38-2023".parse().unwrap();
        assert_eq!(key, WeekKey { week: 38, year: 2023 });
        assert_eq!(key.to_string(), "week-38-2023");
    }

    #[test]
    fn test_week_key_rejects_malformed() {
        for bad in ["week-38", "wk-38-2023", "week-0-2023", "week-54-2023", "week-x-2023", "week-38-23"] {
            assert!(bad.parse::<WeekKey>().is_err(), "{} should not parse", bad);
        }
    }

    #[test]
    fn test_week_key_containing_uses_iso_week() {
        // 2024-12-30 is a Monday in ISO week 1 of 2025
        let date = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert_eq!(WeekKey::containing(date).to_string(), "week-1-2025");
    }

    #[test]
    fn test_week_key_containing_ends_week_on_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert_eq!(WeekKey::containing(sunday).to_string(), "week-1-2025");
        assert_eq!(WeekKey::containing(monday).to_string(), "week-2-2025");
        assert_eq!(WeekKey::containing(monday).date_of(1), Some(monday));
    }

    #[test]
    fn test_date_of_iso_week() {
        let key = WeekKey::new(38, 2023).unwrap();
        assert_eq!(key.date_of(1), NaiveDate::from_ymd_opt(2023, 9, 18));
        assert_eq!(key.date_of(5), NaiveDate::from_ymd_opt(2023, 9, 22));
        assert_eq!(key.date_of(0), None);
    }

    #[test]
    fn test_date_of_falls_back_for_missing_iso_week() {
        // 2023 has 52 ISO weeks
        let key = WeekKey::new(53, 2023).unwrap();
        let expected = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + Duration::days(52 * 7);
        assert_eq!(key.date_of(1), Some(expected));
    }

    #[test]
    fn test_cell_id_roundtrip_preserves_label() {
        let id: CellId = "day-3-12:00 PM".parse().unwrap();
        assert_eq!(id.weekday(), 3);
        assert_eq!(id.time_slot(), "12:00 PM");
        assert_eq!(id.to_string(), "day-3-12:00 PM");
    }

    #[test]
    fn test_cell_id_rejects_weekend_and_unknown_slot() {
        assert_eq!("day-6-9:00 AM".parse::<CellId>(), Err(GridError::InvalidWeekday(6)));
        assert_eq!("day-0-9:00 AM".parse::<CellId>(), Err(GridError::InvalidWeekday(0)));
        assert_eq!(
            "day-1-9:30 AM".parse::<CellId>(),
            Err(GridError::UnknownTimeSlot("9:30 AM".to_string()))
        );
        assert!("1-9:00 AM".parse::<CellId>().is_err());
    }

    #[test]
    fn test_all_cell_ids_cover_full_week() {
        let ids: Vec<String> = CellId::all().map(|id| id.to_string()).collect();
        assert_eq!(ids.len(), 45);
        assert_eq!(ids[0], "day-1-9:00 AM");
        assert_eq!(ids[44], "day-5-5:00 PM");
    }
}
