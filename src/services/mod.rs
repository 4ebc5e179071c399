pub mod ab_test_evaluator;
pub mod workflow_requests;

pub use ab_test_evaluator::AbTestEvaluator;
pub use workflow_requests::{
    apply_metrics_event, apply_transition, lookup_priority, lookup_type, MetricsEventRequest,
    TransitionRequest, TransitionResponse,
};
