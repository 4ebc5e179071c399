use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::workflow_metrics::AverageDenominator;

/// Main configuration structure for marketflow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// A/B evaluation thresholds
    #[serde(default)]
    pub ab_test: AbTestConfig,

    /// Metrics aggregation policy
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for stderr
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for log files (optional, if None logs only to stderr)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log rotation policy for file output
    #[serde(default)]
    pub rotation: RotationPolicy,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

/// Thresholds used by the A/B evaluator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AbTestConfig {
    /// Impressions below this are flagged as an insufficient sample
    #[serde(default = "default_min_sample_size")]
    pub min_sample_size: u64,

    /// Conversion rate (percent) below this raises an alert
    #[serde(default = "default_low_conversion_rate")]
    pub low_conversion_rate: f64,

    /// Significance at or above this marks the result as significant
    #[serde(default = "default_significance_threshold")]
    pub significance_threshold: f64,
}

const fn default_min_sample_size() -> u64 {
    100
}

const fn default_low_conversion_rate() -> f64 {
    1.0
}

const fn default_significance_threshold() -> f64 {
    0.95
}

impl Default for AbTestConfig {
    fn default() -> Self {
        Self {
            min_sample_size: default_min_sample_size(),
            low_conversion_rate: default_low_conversion_rate(),
            significance_threshold: default_significance_threshold(),
        }
    }
}

/// Metrics aggregation policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricsConfig {
    #[serde(default)]
    pub average_denominator: AverageDenominator,
}
