//! Command-line interface
//!
//! A thin consumer of the library: parses arguments, loads configuration,
//! and renders results as tables or JSON.

pub mod commands;
pub mod output;
pub mod table;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::models::Config;
use commands::{
    abtest::AbTestArgs, metrics::MetricsArgs, priority::PriorityArgs, status::StatusArgs,
    workflow_type::TypeArgs,
};

#[derive(Parser, Debug)]
#[command(name = "marketflow")]
#[command(about = "Workflow profiles, execution metrics and A/B test evaluation", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this YAML file instead of .marketflow/
    #[arg(short, long, global = true, env = "MARKETFLOW_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect statuses and validate transitions
    Status(StatusArgs),
    /// Inspect priority scheduling profiles
    Priority(PriorityArgs),
    /// Inspect workflow type capabilities
    #[command(name = "type")]
    Type(TypeArgs),
    /// Apply execution events to a metrics aggregate
    Metrics(MetricsArgs),
    /// Evaluate an A/B experiment
    Abtest(AbTestArgs),
}

/// Shared state handed to every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Emit JSON instead of tables
    pub json: bool,
    /// Loaded configuration
    pub config: Config,
}

/// Dispatch a parsed command.
pub fn execute(command: Commands, ctx: &CommandContext) -> anyhow::Result<()> {
    match command {
        Commands::Status(args) => commands::status::execute(args, ctx),
        Commands::Priority(args) => commands::priority::execute(args, ctx),
        Commands::Type(args) => commands::workflow_type::execute(args, ctx),
        Commands::Metrics(args) => commands::metrics::execute(args, ctx),
        Commands::Abtest(args) => commands::abtest::execute(args, ctx),
    }
}

/// Print an error to stderr and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let kind = err
            .downcast_ref::<crate::domain::DomainError>()
            .map_or("error", crate::domain::DomainError::kind);
        let body = serde_json::json!({
            "error": {
                "kind": kind,
                "message": format!("{err:#}"),
            }
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
