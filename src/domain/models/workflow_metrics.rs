//! Running execution metrics for a workflow.
//!
//! `WorkflowMetrics` is an immutable aggregate. Every operation returns a
//! fresh aggregate that has passed the same validation as construction:
//! `success_count + failure_count <= execution_count`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{normalize_key, DomainError, DomainResult};

/// Denominator used when recomputing `average_execution_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AverageDenominator {
    /// Successes divide by `success_count`, failures by
    /// `success_count + failure_count`.
    #[default]
    Legacy,
    /// Both branches divide by `success_count + failure_count`.
    Completed,
}

/// Health classification derived from the success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsStatus {
    /// `execution_count` is zero
    NeverExecuted,
    /// Success rate of at least 90%
    Excellent,
    /// At least 80%
    Good,
    /// At least 70%
    Fair,
    /// Below 70%
    Poor,
}

impl MetricsStatus {
    /// Every classification, best first after `NeverExecuted`.
    pub const ALL: [Self; 5] = [
        Self::NeverExecuted,
        Self::Excellent,
        Self::Good,
        Self::Fair,
        Self::Poor,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeverExecuted => "never_executed",
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for MetricsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricsStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == key)
            .ok_or_else(|| DomainError::InvalidMetrics(format!("unknown metrics status: {s}")))
    }
}

/// A domain event that updates the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MetricsEvent {
    /// An execution was started
    Execution,
    /// An execution succeeded after `execution_time` ms
    Success { execution_time: u64 },
    /// An execution failed after `execution_time` ms
    Failure { execution_time: u64 },
    /// Pending queue changed by +1 or -1
    PendingDelta { delta: i64 },
}

/// Immutable running aggregate of execution outcomes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawWorkflowMetrics")]
pub struct WorkflowMetrics {
    execution_count: u64,
    success_count: u64,
    failure_count: u64,
    pending_count: u64,
    average_execution_time: f64,
    success_rate: f64,
    failure_rate: f64,
    last_execution_time: u64,
    last_execution_date: Option<DateTime<Utc>>,
    total_execution_time: u64,
}

/// Unvalidated wire form. Counts are signed so negative input can be
/// reported instead of failing inside the number parser. Incoming rates
/// must be percentages, but the stored rates are always re-derived from
/// the counts.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWorkflowMetrics {
    execution_count: i64,
    success_count: i64,
    failure_count: i64,
    pending_count: i64,
    average_execution_time: f64,
    success_rate: f64,
    failure_rate: f64,
    last_execution_time: i64,
    last_execution_date: Option<DateTime<Utc>>,
    total_execution_time: i64,
}

fn non_negative(field: &str, value: i64) -> DomainResult<u64> {
    u64::try_from(value)
        .map_err(|_| DomainError::InvalidMetrics(format!("{field} cannot be negative: {value}")))
}

fn non_negative_f64(field: &str, value: f64) -> DomainResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DomainError::InvalidMetrics(format!(
            "{field} must be a non-negative number: {value}"
        )))
    }
}

fn check_percent(field: &str, value: f64) -> DomainResult<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(DomainError::InvalidMetrics(format!(
            "{field} must be within [0, 100]: {value}"
        )))
    }
}

impl TryFrom<RawWorkflowMetrics> for WorkflowMetrics {
    type Error = DomainError;

    fn try_from(raw: RawWorkflowMetrics) -> Result<Self, Self::Error> {
        check_percent("success_rate", raw.success_rate)?;
        check_percent("failure_rate", raw.failure_rate)?;

        let execution_count = non_negative("execution_count", raw.execution_count)?;
        let success_count = non_negative("success_count", raw.success_count)?;
        let failure_count = non_negative("failure_count", raw.failure_count)?;
        Self {
            execution_count,
            success_count,
            failure_count,
            pending_count: non_negative("pending_count", raw.pending_count)?,
            average_execution_time: non_negative_f64(
                "average_execution_time",
                raw.average_execution_time,
            )?,
            success_rate: percentage(success_count, execution_count),
            failure_rate: percentage(failure_count, execution_count),
            last_execution_time: non_negative("last_execution_time", raw.last_execution_time)?,
            last_execution_date: raw.last_execution_date,
            total_execution_time: non_negative("total_execution_time", raw.total_execution_time)?,
        }
        .validated()
    }
}

/// `count / total` as a percentage, 0 when `total` is 0.
fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

impl WorkflowMetrics {
    /// Aggregate with every field zero or empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an aggregate from counts, deriving rates from them.
    pub fn from_counts(
        execution_count: u64,
        success_count: u64,
        failure_count: u64,
        pending_count: u64,
    ) -> DomainResult<Self> {
        Self {
            execution_count,
            success_count,
            failure_count,
            pending_count,
            success_rate: percentage(success_count, execution_count),
            failure_rate: percentage(failure_count, execution_count),
            ..Self::default()
        }
        .validated()
    }

    fn validated(self) -> DomainResult<Self> {
        let completed = self
            .success_count
            .checked_add(self.failure_count)
            .ok_or_else(|| DomainError::InvalidMetrics("completed count overflows".to_string()))?;
        if completed > self.execution_count {
            return Err(DomainError::InvalidMetrics(format!(
                "success_count ({}) + failure_count ({}) exceeds execution_count ({})",
                self.success_count, self.failure_count, self.execution_count
            )));
        }
        Ok(self)
    }

    /// Executions started.
    pub fn execution_count(&self) -> u64 {
        self.execution_count
    }

    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    /// Executions queued but not started.
    pub fn pending_count(&self) -> u64 {
        self.pending_count
    }

    /// Successes plus failures.
    pub fn completed_count(&self) -> u64 {
        self.success_count + self.failure_count
    }

    /// Milliseconds, see [`AverageDenominator`].
    pub fn average_execution_time(&self) -> f64 {
        self.average_execution_time
    }

    /// Percentage in `[0, 100]`.
    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    /// Percentage in `[0, 100]`.
    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    /// Duration of the most recent completion in ms.
    pub fn last_execution_time(&self) -> u64 {
        self.last_execution_time
    }

    pub fn last_execution_date(&self) -> Option<DateTime<Utc>> {
        self.last_execution_date
    }

    /// Sum of all completion durations in ms.
    pub fn total_execution_time(&self) -> u64 {
        self.total_execution_time
    }

    /// Count a started execution. Rates are left as they were.
    pub fn increment_execution(&self) -> DomainResult<Self> {
        Self {
            execution_count: self.execution_count.saturating_add(1),
            ..self.clone()
        }
        .validated()
    }

    pub fn increment_pending(&self) -> DomainResult<Self> {
        Self {
            pending_count: self.pending_count.saturating_add(1),
            ..self.clone()
        }
        .validated()
    }

    /// Floors at zero.
    pub fn decrement_pending(&self) -> DomainResult<Self> {
        Self {
            pending_count: self.pending_count.saturating_sub(1),
            ..self.clone()
        }
        .validated()
    }

    /// Record a success stamped now, legacy averaging.
    pub fn increment_success(&self, execution_time: u64) -> DomainResult<Self> {
        self.record_success(execution_time, Utc::now(), AverageDenominator::Legacy)
    }

    pub fn increment_success_at(
        &self,
        execution_time: u64,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        self.record_success(execution_time, at, AverageDenominator::Legacy)
    }

    /// Record a failure stamped now.
    pub fn increment_failure(&self, execution_time: u64) -> DomainResult<Self> {
        self.record_failure(execution_time, Utc::now(), AverageDenominator::Legacy)
    }

    pub fn increment_failure_at(
        &self,
        execution_time: u64,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        self.record_failure(execution_time, at, AverageDenominator::Legacy)
    }

    /// Record a successful execution.
    pub fn record_success(
        &self,
        execution_time: u64,
        at: DateTime<Utc>,
        denominator: AverageDenominator,
    ) -> DomainResult<Self> {
        let success_count = self.success_count.saturating_add(1);
        let divisor = match denominator {
            AverageDenominator::Legacy => success_count,
            AverageDenominator::Completed => success_count.saturating_add(self.failure_count),
        };
        self.record_completion(success_count, self.failure_count, divisor, execution_time, at)
    }

    /// Record a failed execution. Both denominators agree on this branch.
    pub fn record_failure(
        &self,
        execution_time: u64,
        at: DateTime<Utc>,
        _denominator: AverageDenominator,
    ) -> DomainResult<Self> {
        let failure_count = self.failure_count.saturating_add(1);
        let divisor = self.success_count.saturating_add(failure_count);
        self.record_completion(self.success_count, failure_count, divisor, execution_time, at)
    }

    fn record_completion(
        &self,
        success_count: u64,
        failure_count: u64,
        divisor: u64,
        execution_time: u64,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let total_execution_time = self.total_execution_time.saturating_add(execution_time);
        Self {
            execution_count: self.execution_count,
            success_count,
            failure_count,
            pending_count: self.pending_count,
            average_execution_time: total_execution_time as f64 / divisor as f64,
            success_rate: percentage(success_count, self.execution_count),
            failure_rate: percentage(failure_count, self.execution_count),
            last_execution_time: execution_time,
            last_execution_date: Some(at),
            total_execution_time,
        }
        .validated()
    }

    /// Apply one event, stamping completions with the current time.
    pub fn apply(&self, event: MetricsEvent) -> DomainResult<Self> {
        self.apply_at(event, Utc::now(), AverageDenominator::Legacy)
    }

    /// Apply one event with an explicit timestamp and averaging rule.
    pub fn apply_at(
        &self,
        event: MetricsEvent,
        at: DateTime<Utc>,
        denominator: AverageDenominator,
    ) -> DomainResult<Self> {
        match event {
            MetricsEvent::Execution => self.increment_execution(),
            MetricsEvent::Success { execution_time } => {
                self.record_success(execution_time, at, denominator)
            }
            MetricsEvent::Failure { execution_time } => {
                self.record_failure(execution_time, at, denominator)
            }
            MetricsEvent::PendingDelta { delta: 1 } => self.increment_pending(),
            MetricsEvent::PendingDelta { delta: -1 } => self.decrement_pending(),
            MetricsEvent::PendingDelta { delta } => Err(DomainError::InvalidMetrics(format!(
                "pending delta must be +1 or -1, got {delta}"
            ))),
        }
    }

    /// Classify health; thresholds are inclusive lower bounds.
    pub fn status(&self) -> MetricsStatus {
        if self.execution_count == 0 {
            return MetricsStatus::NeverExecuted;
        }
        match self.success_rate {
            rate if rate >= 90.0 => MetricsStatus::Excellent,
            rate if rate >= 80.0 => MetricsStatus::Good,
            rate if rate >= 70.0 => MetricsStatus::Fair,
            _ => MetricsStatus::Poor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn executed(times: u64) -> WorkflowMetrics {
        (0..times).fold(WorkflowMetrics::empty(), |m, _| m.increment_execution().unwrap())
    }

    #[test]
    fn test_empty() {
        let m = WorkflowMetrics::empty();
        assert_eq!(m.execution_count(), 0);
        assert_eq!(m.pending_count(), 0);
        assert_eq!(m.last_execution_date(), None);
        assert_eq!(m.status(), MetricsStatus::NeverExecuted);
    }

    #[test]
    fn test_increment_execution_only_touches_count() {
        let m = WorkflowMetrics::empty().increment_execution().unwrap();
        assert_eq!(m.execution_count(), 1);
        assert_eq!(m.success_count(), 0);
        assert!((m.success_rate() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_success_without_execution_is_rejected() {
        let err = WorkflowMetrics::empty().increment_success(100).unwrap_err();
        assert!(matches!(err, DomainError::InvalidMetrics(_)));
    }

    #[test]
    fn test_success_updates_aggregate() {
        let m = executed(2)
            .increment_success_at(100, fixed_time())
            .unwrap()
            .increment_success_at(300, fixed_time())
            .unwrap();

        assert_eq!(m.success_count(), 2);
        assert_eq!(m.total_execution_time(), 400);
        assert!((m.average_execution_time() - 200.0).abs() < f64::EPSILON);
        assert!((m.success_rate() - 100.0).abs() < f64::EPSILON);
        assert_eq!(m.last_execution_time(), 300);
        assert_eq!(m.last_execution_date(), Some(fixed_time()));
    }

    #[test]
    fn test_average_denominator_asymmetry() {
        // success: 100 / 1 = 100; failure: 400 / 2 = 200; success: 500 / 2 = 250
        let m = executed(3).increment_success_at(100, fixed_time()).unwrap();
        assert!((m.average_execution_time() - 100.0).abs() < f64::EPSILON);

        let m = m.increment_failure_at(300, fixed_time()).unwrap();
        assert!((m.average_execution_time() - 200.0).abs() < f64::EPSILON);
        assert!((m.failure_rate() - 100.0 / 3.0).abs() < 1e-9);

        let m = m.increment_success_at(100, fixed_time()).unwrap();
        assert!((m.average_execution_time() - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_completed_denominator() {
        let m = executed(2)
            .record_failure(300, fixed_time(), AverageDenominator::Completed)
            .unwrap()
            .record_success(100, fixed_time(), AverageDenominator::Completed)
            .unwrap();
        assert!((m.average_execution_time() - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pending_floor() {
        let m = WorkflowMetrics::empty().decrement_pending().unwrap();
        assert_eq!(m.pending_count(), 0);
        let m = m.increment_pending().unwrap().increment_pending().unwrap();
        assert_eq!(m.decrement_pending().unwrap().pending_count(), 1);
    }

    #[test]
    fn test_status_boundaries() {
        let cases = [
            (9, MetricsStatus::Excellent),
            (8, MetricsStatus::Good),
            (7, MetricsStatus::Fair),
            (6, MetricsStatus::Poor),
        ];
        for (successes, expected) in cases {
            let m = WorkflowMetrics::from_counts(10, successes, 0, 0).unwrap();
            assert_eq!(m.status(), expected, "{successes} successes");
        }
    }

    #[test]
    fn test_from_counts_rejects_overcount() {
        let err = WorkflowMetrics::from_counts(3, 2, 2, 0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidMetrics(_)));
    }

    #[test]
    fn test_apply_events() {
        let m = WorkflowMetrics::empty()
            .apply(MetricsEvent::Execution)
            .unwrap()
            .apply(MetricsEvent::PendingDelta { delta: 1 })
            .unwrap()
            .apply(MetricsEvent::Failure { execution_time: 50 })
            .unwrap();
        assert_eq!(m.failure_count(), 1);
        assert_eq!(m.pending_count(), 1);
        assert_eq!(m.status(), MetricsStatus::Poor);

        let err = m.apply(MetricsEvent::PendingDelta { delta: 2 }).unwrap_err();
        assert!(matches!(err, DomainError::InvalidMetrics(_)));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: WorkflowMetrics =
            serde_json::from_str(r#"{"execution_count": 4, "success_count": 3}"#).unwrap();
        assert_eq!(ok.success_count(), 3);

        let over = serde_json::from_str::<WorkflowMetrics>(
            r#"{"execution_count": 1, "success_count": 1, "failure_count": 1}"#,
        );
        assert!(over.is_err());

        let negative = serde_json::from_str::<WorkflowMetrics>(r#"{"pending_count": -1}"#);
        assert!(negative.unwrap_err().to_string().contains("cannot be negative"));
    }

    #[test]
    fn test_deserialize_derives_rates_from_counts() {
        let m: WorkflowMetrics =
            serde_json::from_str(r#"{"execution_count": 10, "success_count": 9}"#).unwrap();
        assert!((m.success_rate() - 90.0).abs() < f64::EPSILON);
        assert_eq!(m.status(), MetricsStatus::Excellent);

        let stale: WorkflowMetrics = serde_json::from_str(
            r#"{"execution_count": 10, "success_count": 1, "failure_count": 2,
                "success_rate": 95.0, "failure_rate": 0.0}"#,
        )
        .unwrap();
        assert!((stale.success_rate() - 10.0).abs() < f64::EPSILON);
        assert!((stale.failure_rate() - 20.0).abs() < f64::EPSILON);
        assert_eq!(stale.status(), MetricsStatus::Poor);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_rates() {
        let err = serde_json::from_str::<WorkflowMetrics>(
            r#"{"execution_count": 10, "success_count": 1,
                "success_rate": 500.0, "failure_rate": 250.0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("success_rate must be within [0, 100]"));

        let negative = serde_json::from_str::<WorkflowMetrics>(r#"{"failure_rate": -5.0}"#);
        assert!(negative.is_err());
    }

    #[test]
    fn test_status_parse() {
        for status in MetricsStatus::ALL {
            assert_eq!(status.as_str().parse::<MetricsStatus>().unwrap(), status);
        }
        assert_eq!("Never-Executed".parse::<MetricsStatus>().unwrap(), MetricsStatus::NeverExecuted);
        assert!(matches!(
            "great".parse::<MetricsStatus>(),
            Err(DomainError::InvalidMetrics(_))
        ));
    }

    #[test]
    fn test_event_wire_format() {
        let event: MetricsEvent =
            serde_json::from_str(r#"{"event": "success", "execution_time": 120}"#).unwrap();
        assert_eq!(event, MetricsEvent::Success { execution_time: 120 });
    }
}
