use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid min_sample_size: {0}. Must be at least 1")]
    InvalidMinSampleSize(u64),

    #[error("Invalid low_conversion_rate: {0}. Must be between 0 and 100")]
    InvalidLowConversionRate(f64),

    #[error("Invalid significance_threshold: {0}. Must be strictly between 0 and 1")]
    InvalidSignificanceThreshold(f64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .marketflow/config.yaml (project config)
    /// 3. .marketflow/local.yaml (project local overrides, optional)
    /// 4. Environment variables (MARKETFLOW_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".marketflow/config.yaml"))
            .merge(Yaml::file(".marketflow/local.yaml"))
            .merge(Env::prefixed("MARKETFLOW_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let ab = &config.ab_test;
        if ab.min_sample_size == 0 {
            return Err(ConfigError::InvalidMinSampleSize(ab.min_sample_size));
        }

        if !(0.0..=100.0).contains(&ab.low_conversion_rate) {
            return Err(ConfigError::InvalidLowConversionRate(ab.low_conversion_rate));
        }

        if ab.significance_threshold <= 0.0 || ab.significance_threshold >= 1.0 {
            return Err(ConfigError::InvalidSignificanceThreshold(
                ab.significance_threshold,
            ));
        }

        Ok(())
    }
}
