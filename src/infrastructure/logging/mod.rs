//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Pretty or JSON console output on stderr
//! - Optional JSON log files with rotation

pub mod logger;

pub use crate::domain::models::config::{LogFormat, LoggingConfig, RotationPolicy};
pub use logger::LoggerImpl;
