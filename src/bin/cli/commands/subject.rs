use clap::Subcommand;

use attendance::dto::CreateSubjectDto;

use crate::client::AttendanceClient;
use crate::output::{self, OutputConfig};

/// Subject management commands
#[derive(Subcommand, Debug)]
pub enum SubjectCommands {
    /// List all subjects
    List,
    /// Show a subject
    Get {
        /// The subject ID
        id: String,
    },
    /// Add a subject, or replace the one with the given ID
    Create {
        /// Name of the subject, matched exactly against timetable cells
        #[clap(long)]
        name: String,
        /// Reuse an existing ID to replace that subject
        #[clap(long)]
        id: Option<String>,
        /// Starting attendance percentage
        #[clap(long, default_value_t = 0)]
        percentage: i32,
    },
    /// Delete a subject
    Delete {
        /// The subject ID
        id: String,
    },
    /// Project whether a target attendance is still reachable
    Goal {
        /// The subject ID, or its name with --by-name
        subject: String,
        /// Treat the argument as a subject name
        #[clap(long)]
        by_name: bool,
        /// Target percentage (server default when omitted)
        #[clap(long)]
        target: Option<f64>,
    },
}

/// Executes a subject command
pub async fn execute(
    client: &AttendanceClient,
    cmd: SubjectCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        SubjectCommands::List => {
            let subjects = client.list_subjects().await?;
            output::print_subjects(&subjects, config);
        }
        SubjectCommands::Get { id } => {
            let subject = client.get_subject(&id).await?;
            output::print_subject(&subject, config);
        }
        SubjectCommands::Create { name, id, percentage } => {
            let dto = CreateSubjectDto {
                id,
                name,
                percentage,
                attendance: Vec::new(),
            };
            let subject = client.create_subject(&dto).await?;
            output::print_subject(&subject, config);
        }
        SubjectCommands::Delete { id } => {
            client.delete_subject(&id).await?;
            output::print_success(&format!("Deleted subject {}", id), config);
        }
        SubjectCommands::Goal { subject, by_name, target } => {
            let (name, goal) = if by_name {
                let goal = client.goal_by_name(&subject, target).await?;
                (subject, goal)
            } else {
                let goal = client.subject_goal(&subject, target).await?;
                let name = client.get_subject(&subject).await
                    .map(|s| s.get_name())
                    .unwrap_or(subject);
                (name, goal)
            };
            output::print_goal(&name, target, &goal, config);
        }
    }

    Ok(())
}
