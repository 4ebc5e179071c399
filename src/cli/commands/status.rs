//! Workflow status CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::CommandContext;
use crate::domain::models::WorkflowStatus;
use crate::services::{apply_transition, TransitionRequest};

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(subcommand)]
    pub command: StatusCommands,
}

#[derive(Subcommand, Debug)]
pub enum StatusCommands {
    /// Show the transitions and flags of a status
    Show {
        /// Status name (draft, active, inactive, archived, maintenance)
        status: String,
    },
    /// Validate and execute a transition
    Transition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },
}

#[derive(Debug, Serialize)]
struct StatusDetailOutput {
    status: WorkflowStatus,
    label: &'static str,
    valid_transitions: Vec<WorkflowStatus>,
    is_terminal: bool,
    can_be_executed: bool,
    can_be_edited: bool,
}

impl CommandOutput for StatusDetailOutput {
    fn to_human(&self) -> String {
        let targets = if self.valid_transitions.is_empty() {
            "(none, terminal)".to_string()
        } else {
            self.valid_transitions
                .iter()
                .map(WorkflowStatus::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        [
            format!("Status: {}", self.label),
            format!("Transitions to: {targets}"),
            format!("Executable: {}", yes_no(self.can_be_executed)),
            format!("Editable: {}", yes_no(self.can_be_edited)),
        ]
        .join("\n")
    }
}

#[derive(Debug, Serialize)]
struct TransitionOutput {
    from: WorkflowStatus,
    new_status: WorkflowStatus,
}

impl CommandOutput for TransitionOutput {
    fn to_human(&self) -> String {
        format!("Transitioned {} -> {}", self.from, self.new_status)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Run a `status` subcommand.
pub fn execute(args: StatusArgs, ctx: &CommandContext) -> Result<()> {
    match args.command {
        StatusCommands::Show { status } => {
            let status: WorkflowStatus = status.parse()?;
            let out = StatusDetailOutput {
                status,
                label: status.label(),
                valid_transitions: status.valid_transitions().to_vec(),
                is_terminal: status.is_terminal(),
                can_be_executed: status.can_be_executed(),
                can_be_edited: status.can_be_edited(),
            };
            output(&out, ctx.json);
        }
        StatusCommands::Transition { from, to } => {
            let request = TransitionRequest {
                current_status: from,
                target_status: to,
            };
            let response = apply_transition(&request)?;
            let out = TransitionOutput {
                from: request.current_status.parse()?,
                new_status: response.new_status,
            };
            output(&out, ctx.json);
        }
    }
    Ok(())
}
