pub mod subject;
pub mod timetable;
