//! Metrics aggregate CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::CommandContext;
use crate::domain::models::{MetricsEvent, MetricsStatus, WorkflowMetrics};
use crate::services::{apply_metrics_event, MetricsEventRequest};

#[derive(Args, Debug)]
pub struct MetricsArgs {
    #[command(subcommand)]
    pub command: MetricsCommands,
}

#[derive(Subcommand, Debug)]
pub enum MetricsCommands {
    /// Apply one event and print the resulting aggregate
    Apply {
        /// Event to apply
        #[arg(value_enum)]
        event: EventKind,

        /// Execution time in milliseconds (success and failure events)
        #[arg(short, long, default_value = "0")]
        time: u64,

        /// JSON file holding the current aggregate (empty aggregate if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Classify an aggregate
    Status {
        /// JSON file holding the aggregate
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EventKind {
    Execution,
    Success,
    Failure,
    PendingInc,
    PendingDec,
}

impl EventKind {
    pub fn into_event(self, execution_time: u64) -> MetricsEvent {
        match self {
            Self::Execution => MetricsEvent::Execution,
            Self::Success => MetricsEvent::Success { execution_time },
            Self::Failure => MetricsEvent::Failure { execution_time },
            Self::PendingInc => MetricsEvent::PendingDelta { delta: 1 },
            Self::PendingDec => MetricsEvent::PendingDelta { delta: -1 },
        }
    }
}

#[derive(Debug, Serialize)]
struct MetricsOutput {
    status: MetricsStatus,
    aggregate: WorkflowMetrics,
}

impl CommandOutput for MetricsOutput {
    fn to_human(&self) -> String {
        let m = &self.aggregate;
        let last_run = m
            .last_execution_date()
            .map_or_else(|| "never".to_string(), |at| at.to_rfc3339());
        [
            format!("Status: {}", self.status),
            format!(
                "Executions: {} (success {}, failure {}, pending {})",
                m.execution_count(),
                m.success_count(),
                m.failure_count(),
                m.pending_count()
            ),
            format!(
                "Success rate: {:.2}%  Failure rate: {:.2}%",
                m.success_rate(),
                m.failure_rate()
            ),
            format!(
                "Average time: {:.2} ms  Total: {} ms  Last: {} ms",
                m.average_execution_time(),
                m.total_execution_time(),
                m.last_execution_time()
            ),
            format!("Last execution: {last_run}"),
        ]
        .join("\n")
    }
}

fn read_aggregate(path: &Path) -> Result<WorkflowMetrics> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metrics from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse metrics in {}", path.display()))
}

/// Run a `metrics` subcommand.
pub fn execute(args: MetricsArgs, ctx: &CommandContext) -> Result<()> {
    match args.command {
        MetricsCommands::Apply { event, time, input } => {
            let aggregate = match input {
                Some(path) => read_aggregate(&path)?,
                None => WorkflowMetrics::empty(),
            };
            let request = MetricsEventRequest {
                aggregate,
                event: event.into_event(time),
            };
            let updated =
                apply_metrics_event(&request, ctx.config.metrics.average_denominator)?;
            output(
                &MetricsOutput {
                    status: updated.status(),
                    aggregate: updated,
                },
                ctx.json,
            );
        }
        MetricsCommands::Status { input } => {
            let aggregate = read_aggregate(&input)?;
            output(
                &MetricsOutput {
                    status: aggregate.status(),
                    aggregate,
                },
                ctx.json,
            );
        }
    }
    Ok(())
}
