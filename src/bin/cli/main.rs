mod client;
mod commands;
mod output;

use attendance::config;
use clap::{Parser, Subcommand};
use client::AttendanceClient;
use output::{OutputConfig, OutputFormat};
use std::process;

/// CLI for the attendance tracker
#[derive(Parser, Debug)]
#[clap(name = "attendance-cli", about = "CLI for the attendance tracker")]
struct Cli {
    /// Server URL to connect to
    #[clap(
        long,
        env = "ATTENDANCE_URL",
        global = true
    )]
    server_url: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs or counts)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage subjects
    #[command(subcommand)]
    Subject(commands::subject::SubjectCommands),
    /// Edit and commit the timetable
    #[command(subcommand)]
    Timetable(commands::timetable::TimetableCommands),
    /// Show average attendance and every subject's goal
    Dashboard {
        /// Target percentage (server default when omitted)
        #[clap(long)]
        target: Option<f64>,
    },
    /// Load the demo subjects and week, replacing existing data
    Demo,
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > default
fn resolve_server_url(cli_url: Option<String>) -> String {
    if let Some(url) = cli_url {
        return url;
    }

    let config_dir = config::get_config_dir_path();
    if let Some(ref dir) = config_dir {
        let config_path = dir.join("config.toml");
        if let Ok(update) = config::config_from_file(Some(config_path)) {
            if let Some(url) = update.server_url {
                return url;
            }
        }
    }

    "http://localhost:3000".to_string()
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    if err_string.contains("error sending request")
        || err_string.contains("connection refused")
        || err_string.contains("Connection refused")
        || err_string.contains("tcp connect error")
    {
        return format!(
            "Could not connect to server. Is the attendance server running?\n  {}",
            err_string
        );
    }

    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let server_url = resolve_server_url(cli.server_url);
    let client = AttendanceClient::new(server_url);
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Subject(cmd) => commands::subject::execute(&client, cmd, &output_config).await,
        Commands::Timetable(cmd) => {
            commands::timetable::execute(&client, cmd, &output_config).await
        }
        Commands::Dashboard { target } => match client.dashboard(target).await {
            Ok(dashboard) => {
                output::print_dashboard(&dashboard, &output_config);
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
        Commands::Demo => match client.load_demo().await {
            Ok(summary) => {
                output::print_demo_summary(&summary, &output_config);
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}
