//! A/B test CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use comfy_table::{presets, Cell, Table};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::table::TableFormatter;
use crate::cli::CommandContext;
use crate::domain::models::{AbTestReport, Variant};
use crate::services::AbTestEvaluator;

#[derive(Args, Debug)]
pub struct AbTestArgs {
    #[command(subcommand)]
    pub command: AbTestCommands,
}

#[derive(Subcommand, Debug)]
pub enum AbTestCommands {
    /// Evaluate variants from a JSON file; the first variant is the control
    Report {
        /// JSON array of variants
        file: PathBuf,
    },
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct ReportOutput(AbTestReport);

impl CommandOutput for ReportOutput {
    fn to_human(&self) -> String {
        let report = &self.0;
        let formatter = TableFormatter::new();
        let mut sections =
            vec![formatter.format_variants(&report.per_variant, report.winner_id.as_deref())];

        sections.push(format!(
            "Winner: {}",
            report.winner_id.as_deref().unwrap_or("none")
        ));
        if let (Some(significance), Some(lift)) = (report.significance, report.lift) {
            sections.push(format!(
                "Significance: {:.2}% ({})  Lift: {lift:+.2}%",
                significance * 100.0,
                if report.is_significant {
                    "significant"
                } else {
                    "not significant"
                }
            ));
        }

        let mut recs = Table::new();
        recs.load_preset(presets::NOTHING);
        for rec in &report.recommendations {
            recs.add_row(vec![
                formatter.severity_cell(rec.severity),
                Cell::new(&rec.message),
            ]);
        }
        sections.push(format!("Recommendations:\n{recs}"));

        sections.join("\n")
    }
}

fn read_variants(path: &Path) -> Result<Vec<Variant>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read variants from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse variants in {}", path.display()))
}

/// Run an `abtest` subcommand.
pub fn execute(args: AbTestArgs, ctx: &CommandContext) -> Result<()> {
    match args.command {
        AbTestCommands::Report { file } => {
            let variants = read_variants(&file)?;
            let evaluator = AbTestEvaluator::new(ctx.config.ab_test.clone());
            output(&ReportOutput(evaluator.evaluate(&variants)), ctx.json);
        }
    }
    Ok(())
}
