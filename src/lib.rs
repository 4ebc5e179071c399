//! marketflow - workflow profiles, execution metrics and A/B evaluation
//!
//! The core is a set of pure value objects and functions consumed by
//! orchestration code that owns persistence and I/O:
//!
//! - **Workflow status** state machine with a fixed transition table
//! - **Priority** and **type** profiles backed by static lookup tables
//! - **Metrics** aggregate replaced (never mutated) on every execution event
//! - **A/B evaluator** computing rates, intervals, significance and a winner
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): value objects and domain errors
//! - **Service Layer** (`services`): A/B evaluation and string-level request handling
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```
//! use marketflow::domain::models::{WorkflowMetrics, WorkflowStatus};
//!
//! let status = WorkflowStatus::Draft.transition_to(WorkflowStatus::Active).unwrap();
//! assert!(status.can_be_executed());
//!
//! let metrics = WorkflowMetrics::empty()
//!     .increment_execution()
//!     .and_then(|m| m.increment_success(120))
//!     .unwrap();
//! assert_eq!(metrics.status().as_str(), "excellent");
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::models::{
    AbTestConfig, AbTestReport, AverageDenominator, Config, MetricsEvent, MetricsStatus,
    PriorityCharacteristics, TypeCharacteristics, Variant, WorkflowMetrics, WorkflowPriority,
    WorkflowStatus, WorkflowType,
};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::AbTestEvaluator;
