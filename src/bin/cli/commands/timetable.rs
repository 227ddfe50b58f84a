use clap::{Subcommand, ValueEnum};

use attendance::models::{AttendanceMark, CellId, CellPatch, WeekKey};

use crate::client::AttendanceClient;
use crate::output::{self, OutputConfig};

/// Attendance mark as typed on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MarkArg {
    Present,
    Absent,
    Unmarked,
}

impl From<MarkArg> for AttendanceMark {
    fn from(mark: MarkArg) -> Self {
        match mark {
            MarkArg::Present => AttendanceMark::Present,
            MarkArg::Absent => AttendanceMark::Absent,
            MarkArg::Unmarked => AttendanceMark::Unmarked,
        }
    }
}

/// Where a cell is: week key, weekday and time slot
#[derive(clap::Args, Debug)]
pub struct CellArgs {
    /// Week key, e.g. week-10-2025
    week_key: String,
    /// Weekday, 1 (Monday) to 5 (Friday)
    weekday: u8,
    /// Time slot label, e.g. "9:00 AM"
    time_slot: String,
}

impl CellArgs {
    /// Validates the arguments into the path parts the server expects
    fn resolve(&self) -> Result<(String, String), Box<dyn std::error::Error>> {
        let week_key: WeekKey = self.week_key.parse()?;
        let cell_id = CellId::new(self.weekday, &self.time_slot)?;
        Ok((week_key.to_string(), cell_id.to_string()))
    }
}

/// Timetable commands
#[derive(Subcommand, Debug)]
pub enum TimetableCommands {
    /// Show one week
    Week {
        /// Week key, e.g. week-10-2025
        week_key: String,
    },
    /// Show the week containing today
    Current,
    /// Edit a cell
    Set {
        #[command(flatten)]
        cell: CellArgs,
        /// Subject taught in this slot ("" to clear)
        #[clap(long)]
        subject: Option<String>,
        /// Attendance mark
        #[clap(long, value_enum)]
        mark: Option<MarkArg>,
        /// Free-form note
        #[clap(long)]
        notes: Option<String>,
    },
    /// Toggle the holiday flag of a cell
    Holiday {
        #[command(flatten)]
        cell: CellArgs,
    },
    /// Mark a cell present or absent
    Mark {
        #[command(flatten)]
        cell: CellArgs,
        /// Mark present
        #[clap(long, conflicts_with = "absent", required_unless_present = "absent")]
        present: bool,
        /// Mark absent
        #[clap(long)]
        absent: bool,
    },
    /// Recompute every subject from the timetable and store it
    Commit,
}

/// Executes a timetable command
pub async fn execute(
    client: &AttendanceClient,
    cmd: TimetableCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        TimetableCommands::Week { week_key } => {
            let week_key: WeekKey = week_key.parse()?;
            let week = client.get_week(&week_key.to_string()).await?;
            output::print_week(&week, config);
        }
        TimetableCommands::Current => {
            let week = client.current_week().await?;
            output::print_week(&week, config);
        }
        TimetableCommands::Set { cell, subject, mark, notes } => {
            let (week_key, cell_id) = cell.resolve()?;
            let patch = CellPatch {
                subject_name: subject,
                attendance_mark: mark.map(AttendanceMark::from),
                is_holiday: None,
                notes,
            };
            let update = client.set_cell(&week_key, &cell_id, &patch).await?;
            output::print_cell_update(&update, config);
        }
        TimetableCommands::Holiday { cell } => {
            let (week_key, cell_id) = cell.resolve()?;
            let update = client.toggle_holiday(&week_key, &cell_id).await?;
            output::print_cell_update(&update, config);
        }
        TimetableCommands::Mark { cell, present, absent: _ } => {
            let (week_key, cell_id) = cell.resolve()?;
            let update = client.mark_attendance(&week_key, &cell_id, present).await?;
            output::print_cell_update(&update, config);
        }
        TimetableCommands::Commit => {
            let summary = client.commit().await?;
            output::print_commit_summary(&summary, config);
        }
    }

    Ok(())
}
