//! Workflow priority CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::table::TableFormatter;
use crate::cli::CommandContext;
use crate::domain::models::{PriorityCharacteristics, WorkflowPriority};

#[derive(Args, Debug)]
pub struct PriorityArgs {
    #[command(subcommand)]
    pub command: PriorityCommands,
}

#[derive(Subcommand, Debug)]
pub enum PriorityCommands {
    /// List every priority level in scheduling order
    List,
    /// Show the profile of one level
    Show {
        /// Priority level (low, medium, high, urgent)
        priority: String,
    },
}

#[derive(Debug, Serialize)]
struct PriorityEntry {
    priority: WorkflowPriority,
    weight: u8,
    #[serde(flatten)]
    characteristics: PriorityCharacteristics,
}

impl From<WorkflowPriority> for PriorityEntry {
    fn from(priority: WorkflowPriority) -> Self {
        Self {
            priority,
            weight: priority.weight(),
            characteristics: *priority.characteristics(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PriorityListOutput {
    priorities: Vec<PriorityEntry>,
}

impl CommandOutput for PriorityListOutput {
    fn to_human(&self) -> String {
        let levels: Vec<_> = self.priorities.iter().map(|p| p.priority).collect();
        TableFormatter::new().format_priorities(&levels)
    }
}

impl CommandOutput for PriorityEntry {
    fn to_human(&self) -> String {
        let c = &self.characteristics;
        [
            format!("Priority: {} (weight {})", self.priority, self.weight),
            format!("Execution order: {}", c.execution_order),
            format!("Max concurrent executions: {}", c.max_concurrent_executions),
            format!("Timeout multiplier: {}", c.timeout_multiplier),
            format!("Retry attempts: {}", c.retry_attempts),
            format!("Notification level: {}", c.notification_level),
        ]
        .join("\n")
    }
}

/// Run a `priority` subcommand.
pub fn execute(args: PriorityArgs, ctx: &CommandContext) -> Result<()> {
    match args.command {
        PriorityCommands::List => {
            let mut levels = WorkflowPriority::ALL.to_vec();
            levels.sort_by_key(WorkflowPriority::execution_order);
            let out = PriorityListOutput {
                priorities: levels.into_iter().map(PriorityEntry::from).collect(),
            };
            output(&out, ctx.json);
        }
        PriorityCommands::Show { priority } => {
            let entry = PriorityEntry::from(WorkflowPriority::parse(&priority)?);
            output(&entry, ctx.json);
        }
    }
    Ok(())
}
