//! String-level request handling for workflow value objects.
//!
//! Callers exchange plain strings and JSON-friendly records; this module
//! parses them at the boundary and delegates to the domain types.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    AverageDenominator, MetricsEvent, PriorityCharacteristics, TypeCharacteristics,
    WorkflowMetrics, WorkflowPriority, WorkflowStatus, WorkflowType,
};

/// Status change requested by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// Status the workflow is in now
    pub current_status: String,
    /// Status it should move to
    pub target_status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionResponse {
    /// Status after a successful transition
    pub new_status: WorkflowStatus,
}

/// An event to fold into a caller-held aggregate.
///
/// The aggregate's rates are re-derived from its counts on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsEventRequest {
    /// Missing means an empty aggregate
    #[serde(default)]
    pub aggregate: WorkflowMetrics,
    /// Event to apply
    pub event: MetricsEvent,
}

/// Parse both statuses and run the transition table.
pub fn apply_transition(request: &TransitionRequest) -> DomainResult<TransitionResponse> {
    let current: WorkflowStatus = request.current_status.parse()?;
    let target: WorkflowStatus = request.target_status.parse()?;

    match current.transition_to(target) {
        Ok(new_status) => {
            debug!(from = %current, to = %new_status, "status transition accepted");
            Ok(TransitionResponse { new_status })
        }
        Err(err) => {
            warn!(from = %current, to = %target, "status transition rejected");
            Err(err)
        }
    }
}

/// Characteristics for a priority name.
pub fn lookup_priority(priority: &str) -> DomainResult<PriorityCharacteristics> {
    Ok(*WorkflowPriority::parse(priority)?.characteristics())
}

/// Characteristics for a type name.
pub fn lookup_type(kind: &str) -> DomainResult<TypeCharacteristics> {
    Ok(*WorkflowType::parse(kind)?.characteristics())
}

/// Apply one event to the supplied aggregate and return the replacement.
pub fn apply_metrics_event(
    request: &MetricsEventRequest,
    denominator: AverageDenominator,
) -> DomainResult<WorkflowMetrics> {
    let updated = request
        .aggregate
        .apply_at(request.event, chrono::Utc::now(), denominator)?;
    debug!(
        event = ?request.event,
        execution_count = updated.execution_count(),
        success_rate = updated.success_rate(),
        "metrics event applied"
    );
    Ok(updated)
}
