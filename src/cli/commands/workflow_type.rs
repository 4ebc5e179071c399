//! Workflow type CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::table::TableFormatter;
use crate::cli::CommandContext;
use crate::domain::models::{TypeCharacteristics, WorkflowType};

#[derive(Args, Debug)]
pub struct TypeArgs {
    #[command(subcommand)]
    pub command: TypeCommands,
}

#[derive(Subcommand, Debug)]
pub enum TypeCommands {
    /// List every workflow type
    List,
    /// Show the capabilities of one type
    Show {
        /// Workflow type (automation, integration, notification, data_processing, ...)
        kind: String,
    },
}

#[derive(Debug, Serialize)]
struct TypeEntry {
    #[serde(rename = "type")]
    kind: WorkflowType,
    #[serde(flatten)]
    characteristics: TypeCharacteristics,
}

impl From<WorkflowType> for TypeEntry {
    fn from(kind: WorkflowType) -> Self {
        Self {
            kind,
            characteristics: *kind.characteristics(),
        }
    }
}

impl CommandOutput for TypeEntry {
    fn to_human(&self) -> String {
        TableFormatter::new().format_types(&[self.kind])
    }
}

#[derive(Debug, Serialize)]
struct TypeListOutput {
    types: Vec<TypeEntry>,
}

impl CommandOutput for TypeListOutput {
    fn to_human(&self) -> String {
        let kinds: Vec<_> = self.types.iter().map(|t| t.kind).collect();
        TableFormatter::new().format_types(&kinds)
    }
}

/// Run a `type` subcommand.
pub fn execute(args: TypeArgs, ctx: &CommandContext) -> Result<()> {
    match args.command {
        TypeCommands::List => {
            let out = TypeListOutput {
                types: WorkflowType::ALL.into_iter().map(TypeEntry::from).collect(),
            };
            output(&out, ctx.json);
        }
        TypeCommands::Show { kind } => {
            output(&TypeEntry::from(WorkflowType::parse(&kind)?), ctx.json);
        }
    }
    Ok(())
}
