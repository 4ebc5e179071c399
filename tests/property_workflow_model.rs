use marketflow::domain::models::{
    AverageDenominator, MetricsEvent, MetricsStatus, WorkflowMetrics, WorkflowPriority,
    WorkflowStatus,
};
use marketflow::AbTestEvaluator;
use marketflow::Variant;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn any_status() -> impl Strategy<Value = WorkflowStatus> {
    prop::sample::select(WorkflowStatus::ALL.to_vec())
}

fn any_priority() -> impl Strategy<Value = WorkflowPriority> {
    prop::sample::select(WorkflowPriority::ALL.to_vec())
}

fn any_event() -> impl Strategy<Value = MetricsEvent> {
    prop_oneof![
        3 => Just(MetricsEvent::Execution),
        2 => (0u64..10_000).prop_map(|execution_time| MetricsEvent::Success { execution_time }),
        2 => (0u64..10_000).prop_map(|execution_time| MetricsEvent::Failure { execution_time }),
        1 => Just(MetricsEvent::PendingDelta { delta: 1 }),
        1 => Just(MetricsEvent::PendingDelta { delta: -1 }),
    ]
}

fn any_denominator() -> impl Strategy<Value = AverageDenominator> {
    prop_oneof![
        Just(AverageDenominator::Legacy),
        Just(AverageDenominator::Completed)
    ]
}

fn expected_targets(status: WorkflowStatus) -> &'static [WorkflowStatus] {
    use WorkflowStatus::{Active, Archived, Draft, Inactive, Maintenance};
    match status {
        Draft => &[Active, Archived],
        Active => &[Inactive, Maintenance, Archived],
        Inactive => &[Active, Maintenance, Archived],
        Maintenance => &[Active, Inactive, Archived],
        Archived => &[],
    }
}

proptest! {
    /// Property: transitions succeed exactly for table entries and return the target
    #[test]
    fn prop_transition_matches_table(current in any_status(), target in any_status()) {
        let allowed = expected_targets(current).contains(&target);
        prop_assert_eq!(current.can_transition_to(target), allowed);

        match current.transition_to(target) {
            Ok(next) => {
                prop_assert!(allowed);
                prop_assert_eq!(next, target);
            }
            Err(_) => prop_assert!(!allowed),
        }
    }

    /// Property: archived never transitions anywhere
    #[test]
    fn prop_archived_is_terminal(target in any_status()) {
        prop_assert!(!WorkflowStatus::Archived.can_transition_to(target));
    }

    /// Property: weight and execution order rank priorities in opposite directions
    #[test]
    fn prop_priority_order_consistency(a in any_priority(), b in any_priority()) {
        prop_assert_eq!(
            a.weight() > b.weight(),
            a.execution_order() < b.execution_order()
        );
        prop_assert_eq!(a.greater_than(b), b.less_than(a));
    }

    /// Property: every aggregate reachable from empty keeps its invariants
    ///
    /// Rejected events leave the previous aggregate in place, mirroring a
    /// caller that refuses to persist an invalid replacement.
    #[test]
    fn prop_metrics_invariants(
        events in prop::collection::vec(any_event(), 0..60),
        denominator in any_denominator(),
    ) {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut metrics = WorkflowMetrics::empty();

        for event in events {
            if let Ok(next) = metrics.apply_at(event, at, denominator) {
                metrics = next;
            }

            prop_assert!(
                metrics.success_count() + metrics.failure_count() <= metrics.execution_count()
            );
            prop_assert!((0.0..=100.0).contains(&metrics.success_rate()));
            prop_assert!((0.0..=100.0).contains(&metrics.failure_rate()));
            if metrics.execution_count() > 0 {
                prop_assert!(metrics.success_rate() + metrics.failure_rate() <= 100.0 + 1e-9);
            }
        }
    }

    /// Property: a deserialized aggregate is either rejected or carries
    /// rates in [0, 100] that agree with its counts and its status
    #[test]
    fn prop_deserialized_metrics_rates_follow_counts(
        execution_count in 0i64..200,
        success_count in 0i64..200,
        failure_count in 0i64..200,
        success_rate in -50.0f64..600.0,
        failure_rate in -50.0f64..600.0,
    ) {
        let json = serde_json::json!({
            "execution_count": execution_count,
            "success_count": success_count,
            "failure_count": failure_count,
            "success_rate": success_rate,
            "failure_rate": failure_rate,
        });

        let consistent = success_count + failure_count <= execution_count
            && (0.0..=100.0).contains(&success_rate)
            && (0.0..=100.0).contains(&failure_rate);

        match serde_json::from_value::<WorkflowMetrics>(json) {
            Ok(metrics) => {
                prop_assert!(consistent);
                prop_assert!((0.0..=100.0).contains(&metrics.success_rate()));
                prop_assert!((0.0..=100.0).contains(&metrics.failure_rate()));

                let rebuilt = WorkflowMetrics::from_counts(
                    metrics.execution_count(),
                    metrics.success_count(),
                    metrics.failure_count(),
                    0,
                ).unwrap();
                prop_assert_eq!(metrics.success_rate(), rebuilt.success_rate());
                prop_assert_eq!(metrics.failure_rate(), rebuilt.failure_rate());
                prop_assert_eq!(metrics.status(), rebuilt.status());
                if metrics.execution_count() == 0 {
                    prop_assert_eq!(metrics.status(), MetricsStatus::NeverExecuted);
                }
            }
            Err(_) => prop_assert!(!consistent),
        }
    }

    /// Property: significance always stays in [0, 0.99]
    #[test]
    fn prop_significance_bounds(
        n1 in 0u64..5_000, c1 in 0u64..5_000,
        n2 in 0u64..5_000, c2 in 0u64..5_000,
    ) {
        let control = Variant::new("a", "A").with_counts(n1, 0, c1.min(n1));
        let variant = Variant::new("b", "B").with_counts(n2, 0, c2.min(n2));
        let sig = AbTestEvaluator::default().significance(&control, &variant);
        prop_assert!((0.0..=0.99).contains(&sig));
    }
}
