use attendance::dto::{CellUpdateDto, CommitSummary, DashboardDto, DemoSummaryDto, WeekDto};
use attendance::models::{AttendanceGoal, AttendanceMark, Cell, CellId, Subject, TIME_SLOTS, WEEKDAYS};
use clap::ValueEnum;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

/// Bundled output configuration passed to all print functions
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    /// The output format
    pub format: OutputFormat,
    /// When true, print minimal output (just IDs or counts)
    pub quiet: bool,
}

/// Pretty-prints any response as JSON
fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: could not encode output: {}", e),
    }
}

const WEEKDAY_NAMES: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

fn mark_symbol(cell: &Cell) -> &'static str {
    if cell.is_holiday {
        return "H";
    }
    match cell.attendance_mark {
        AttendanceMark::Present => "+",
        AttendanceMark::Absent => "-",
        AttendanceMark::Unmarked => " ",
    }
}

/// Prints a list of subjects in the specified format
pub fn print_subjects(subjects: &[Subject], config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if subjects.is_empty() {
                if !config.quiet {
                    println!("No subjects found.");
                }
                return;
            }
            if config.quiet {
                for subject in subjects {
                    println!("{}", subject.get_id());
                }
                return;
            }
            let max_id = subjects.iter().map(|s| s.get_id().len()).max().unwrap_or(2);
            let max_name = subjects.iter().map(|s| s.get_name().len()).max().unwrap_or(4).max(4);
            println!("{:<id_w$}  {:<name_w$}  ATTENDANCE", "ID", "NAME", id_w = max_id, name_w = max_name);
            for subject in subjects {
                let flag = if subject.is_critical() { "  (critical)" } else { "" };
                println!(
                    "{:<id_w$}  {:<name_w$}  {:>3}%{}",
                    subject.get_id(),
                    subject.get_name(),
                    subject.get_percentage(),
                    flag,
                    id_w = max_id,
                    name_w = max_name,
                );
            }
        }
        OutputFormat::Json => print_json(subjects),
    }
}

/// Prints a single subject in the specified format
pub fn print_subject(subject: &Subject, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", subject.get_id());
                return;
            }
            println!("ID:         {}", subject.get_id());
            println!("Name:       {}", subject.get_name());
            println!("Attendance: {}%", subject.get_percentage());
            println!("Records:    {}", subject.get_attendance().len());
            if subject.is_critical() {
                println!("Status:     critical");
            }
        }
        OutputFormat::Json => print_json(subject),
    }
}

/// Prints a goal projection in the specified format
pub fn print_goal(name: &str, target: Option<f64>, goal: &AttendanceGoal, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", goal.classes_needed);
                return;
            }
            if goal.total_classes == 0 {
                println!("No scheduled classes for {}.", name);
                return;
            }
            match target {
                Some(t) => println!("{} (target {}%)", name, t),
                None => println!("{}", name),
            }
            println!("  Current:    {}% ({}/{} attended)", goal.current_attendance, goal.classes_attended, goal.total_classes);
            println!("  Needed:     {} more of {} remaining", goal.classes_needed, goal.remaining_classes);
            println!("  Best case:  {}%", goal.future_projection);
            println!("  Per week:   {} classes, {} weeks needed", goal.weekly_classes, goal.weeks_needed);
            println!("  Reachable:  {}", if goal.is_possible { "yes" } else { "no" });
        }
        OutputFormat::Json => print_json(goal),
    }
}

/// Prints one week as a time slot by weekday grid
pub fn print_week(week: &WeekDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", week.week_key);
                return;
            }
            let width = week.cells.values()
                .map(|c| c.subject_name.len())
                .max()
                .unwrap_or(0)
                .max(3);
            println!("Week {}", week.week_key);
            print!("{:<8}", "");
            for name in WEEKDAY_NAMES {
                print!("  {:<width$}", name, width = width + 2);
            }
            println!();
            for slot in TIME_SLOTS {
                print!("{:<8}", slot);
                for weekday in WEEKDAYS {
                    let cell = CellId::new(weekday, slot)
                        .ok()
                        .and_then(|id| week.cells.get(&id.to_string()));
                    match cell {
                        Some(cell) => print!("  {} {:<width$}", mark_symbol(cell), cell.subject_name, width = width),
                        None => print!("  {:<width$}", "", width = width + 2),
                    }
                }
                println!();
            }
            println!("(+ present, - absent, H holiday)");
        }
        OutputFormat::Json => print_json(week),
    }
}

/// Prints the result of a single-cell edit
pub fn print_cell_update(update: &CellUpdateDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", update.applied);
                return;
            }
            let cell = &update.cell;
            let subject = if cell.subject_name.is_empty() { "(unassigned)" } else { cell.subject_name.as_str() };
            println!("Cell:    {} {}", update.week_key, update.cell_id);
            println!("Subject: {}", subject);
            println!("Mark:    {:?}", cell.attendance_mark);
            println!("Holiday: {}", cell.is_holiday);
            if let Some(notes) = &cell.notes {
                println!("Notes:   {}", notes);
            }
            if !update.applied {
                println!("Not applied: the cell is a holiday.");
            }
        }
        OutputFormat::Json => print_json(update),
    }
}

/// Prints what a commit wrote
pub fn print_commit_summary(summary: &CommitSummary, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", summary.created.len() + summary.updated.len());
                return;
            }
            println!(
                "Committed {} weeks: {} subjects created, {} updated",
                summary.weeks,
                summary.created.len(),
                summary.updated.len()
            );
            for name in &summary.created {
                println!("  + {}", name);
            }
            for name in &summary.updated {
                println!("  ~ {}", name);
            }
        }
        OutputFormat::Json => print_json(summary),
    }
}

/// Prints the dashboard overview
pub fn print_dashboard(dashboard: &DashboardDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", dashboard.average_attendance);
                return;
            }
            println!(
                "Average attendance: {}% (target {}%)",
                dashboard.average_attendance, dashboard.target_percentage
            );
            if dashboard.subjects.is_empty() {
                println!("No subjects found.");
                return;
            }
            let max_name = dashboard.subjects.iter()
                .map(|s| s.subject.get_name().len())
                .max()
                .unwrap_or(4)
                .max(4);
            println!("{:<width$}  CACHED  NOW   NEEDED  REACHABLE", "NAME", width = max_name);
            for row in &dashboard.subjects {
                let flag = if row.is_critical { "  (critical)" } else { "" };
                println!(
                    "{:<width$}  {:>5}%  {:>3}%  {:>6}  {:<9}{}",
                    row.subject.get_name(),
                    row.subject.get_percentage(),
                    row.goal.current_attendance,
                    row.goal.classes_needed,
                    if row.goal.is_possible { "yes" } else { "no" },
                    flag,
                    width = max_name,
                );
            }
        }
        OutputFormat::Json => print_json(dashboard),
    }
}

/// Prints what loading the demo data wrote
pub fn print_demo_summary(summary: &DemoSummaryDto, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if config.quiet {
                println!("{}", summary.week_key);
                return;
            }
            println!("Loaded {} demo subjects and week {}", summary.subjects, summary.week_key);
        }
        OutputFormat::Json => print_json(summary),
    }
}

/// Prints a success message in the specified format
pub fn print_success(message: &str, config: &OutputConfig) {
    match config.format {
        OutputFormat::Human => {
            if !config.quiet {
                println!("{}", message);
            }
        }
        OutputFormat::Json => {
            print_json(&serde_json::json!({ "status": "ok", "message": message }));
        }
    }
}
