pub mod config;
pub mod workflow_metrics;
pub mod workflow_priority;
pub mod workflow_status;
pub mod workflow_type;

pub use ab_test::{
    AbTestReport, ConfidenceInterval, Recommendation, RecommendationKind, RecommendationSeverity,
    Variant, VariantReport,
};
pub use config::{AbTestConfig, Config, LogFormat, LoggingConfig, MetricsConfig, RotationPolicy};
pub use workflow_metrics::{AverageDenominator, MetricsEvent, MetricsStatus, WorkflowMetrics};
pub use workflow_priority::{NotificationLevel, PriorityCharacteristics, WorkflowPriority};
pub use workflow_status::WorkflowStatus;
pub use workflow_type::{TypeCharacteristics, WorkflowType};
