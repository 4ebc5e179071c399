//! Table output formatting for CLI commands
//!
//! Renders priority and type profiles and A/B variant reports with comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{
    RecommendationSeverity, VariantReport, WorkflowPriority, WorkflowType,
};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn format_priorities(&self, priorities: &[WorkflowPriority]) -> String {
        let mut table = create_base_table();
        table.set_header(header(&[
            "Priority",
            "Weight",
            "Order",
            "Max Concurrent",
            "Timeout x",
            "Retries",
            "Notify",
        ]));

        for priority in priorities {
            let c = priority.characteristics();
            table.add_row(vec![
                Cell::new(priority.as_str()),
                Cell::new(priority.weight()),
                Cell::new(c.execution_order),
                Cell::new(c.max_concurrent_executions),
                Cell::new(c.timeout_multiplier),
                Cell::new(c.retry_attempts),
                Cell::new(c.notification_level.as_str()),
            ]);
        }

        table.to_string()
    }

    pub fn format_types(&self, types: &[WorkflowType]) -> String {
        let mut table = create_base_table();
        table.set_header(header(&[
            "Type",
            "Triggers",
            "Conditions",
            "Actions",
            "Scheduling",
            "Approval",
            "Parallel",
            "Max Time (s)",
        ]));

        for kind in types {
            let c = kind.characteristics();
            table.add_row(vec![
                Cell::new(kind.as_str()),
                self.flag(c.supports_triggers),
                self.flag(c.supports_conditions),
                self.flag(c.supports_actions),
                self.flag(c.supports_scheduling),
                self.flag(c.requires_approval),
                self.flag(c.supports_parallel_execution),
                Cell::new(c.max_execution_time),
            ]);
        }

        table.to_string()
    }

    pub fn format_variants(&self, variants: &[VariantReport], winner_id: Option<&str>) -> String {
        let mut table = create_base_table();
        table.set_header(header(&[
            "ID", "Name", "Impressions", "CR %", "CTR %", "AOV", "95% CI",
        ]));

        for v in variants {
            let mut id_cell = Cell::new(&v.id);
            if winner_id == Some(v.id.as_str()) {
                id_cell = id_cell.add_attribute(Attribute::Bold);
                if self.use_colors {
                    id_cell = id_cell.fg(Color::Green);
                }
            }
            table.add_row(vec![
                id_cell,
                Cell::new(&v.name),
                Cell::new(v.impressions),
                Cell::new(format!("{:.2}", v.conversion_rate)),
                Cell::new(format!("{:.2}", v.ctr)),
                Cell::new(format!("{:.2}", v.aov)),
                Cell::new(format!(
                    "{:.2} - {:.2}",
                    v.confidence_interval.lower, v.confidence_interval.upper
                )),
            ]);
        }

        table.to_string()
    }

    pub fn severity_cell(&self, severity: RecommendationSeverity) -> Cell {
        let (label, color) = match severity {
            RecommendationSeverity::Info => ("info", Color::Blue),
            RecommendationSeverity::Warning => ("warning", Color::Yellow),
            RecommendationSeverity::Alert => ("alert", Color::Red),
        };
        if self.use_colors {
            Cell::new(label).fg(color)
        } else {
            Cell::new(label)
        }
    }

    fn flag(&self, value: bool) -> Cell {
        match (value, self.use_colors) {
            (true, true) => Cell::new("yes").fg(Color::Green),
            (false, true) => Cell::new("no").fg(Color::DarkGrey),
            (true, false) => Cell::new("yes"),
            (false, false) => Cell::new("no"),
        }
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

fn create_base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Check if the terminal supports colors
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}
