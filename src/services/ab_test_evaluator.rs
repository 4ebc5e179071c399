//! Statistical evaluation of A/B test variants.
//!
//! Every formula has an explicit zero guard: an experiment with no data
//! yields zero-valued output instead of an error.

use tracing::{debug, instrument};

use crate::domain::models::{
    AbTestConfig, AbTestReport, ConfidenceInterval, Recommendation, RecommendationKind, Variant,
    VariantReport,
};

/// z-value for a two-sided 95% interval.
const Z_95: f64 = 1.96;

/// Coefficients of the logistic approximation to the normal CDF.
const LOGISTIC_LINEAR: f64 = 0.717;
const LOGISTIC_QUADRATIC: f64 = 0.416;

/// Upper bound reported for significance.
const MAX_SIGNIFICANCE: f64 = 0.99;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Evaluates experiment variants against configured thresholds.
#[derive(Debug, Clone, Default)]
pub struct AbTestEvaluator {
    config: AbTestConfig,
}

impl AbTestEvaluator {
    /// Evaluator using the given thresholds.
    pub fn new(config: AbTestConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &AbTestConfig {
        &self.config
    }

    /// Conversions per impression, as a percentage rounded to 2 decimals.
    pub fn conversion_rate(&self, variant: &Variant) -> f64 {
        if variant.impressions == 0 {
            return 0.0;
        }
        round_to(
            variant.conversions as f64 * 100.0 / variant.impressions as f64,
            2,
        )
    }

    /// Click-through rate, as a percentage rounded to 2 decimals.
    pub fn ctr(&self, variant: &Variant) -> f64 {
        if variant.impressions == 0 {
            return 0.0;
        }
        round_to(variant.clicks as f64 * 100.0 / variant.impressions as f64, 2)
    }

    /// Average order value.
    pub fn aov(&self, variant: &Variant) -> f64 {
        if variant.conversions == 0 {
            return 0.0;
        }
        round_to(variant.revenue / variant.conversions as f64, 2)
    }

    /// Wald interval at 95% around the conversion rate, clamped to `[0, 100]`.
    pub fn confidence_interval(&self, variant: &Variant) -> ConfidenceInterval {
        if variant.impressions == 0 {
            return ConfidenceInterval::default();
        }
        let n = variant.impressions as f64;
        let rate = variant.conversions as f64 / n;
        let margin = Z_95 * (rate * (1.0 - rate) / n).sqrt();

        ConfidenceInterval {
            lower: round_to((rate - margin).clamp(0.0, 1.0) * 100.0, 2),
            upper: round_to((rate + margin).clamp(0.0, 1.0) * 100.0, 2),
        }
    }

    /// Pooled two-proportion z-test mapped onto `[0, 0.99]`.
    pub fn significance(&self, control: &Variant, variant: &Variant) -> f64 {
        if control.impressions == 0 || variant.impressions == 0 {
            return 0.0;
        }

        let n1 = control.impressions as f64;
        let n2 = variant.impressions as f64;
        let p1 = control.conversions as f64 / control.impressions.max(1) as f64;
        let p2 = variant.conversions as f64 / variant.impressions.max(1) as f64;

        let pooled = (p1 * n1 + p2 * n2) / (n1 + n2);
        let se = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();
        if se == 0.0 || !se.is_finite() {
            return 0.0;
        }

        let z = (p2 - p1).abs() / se;
        let tail = logistic(-LOGISTIC_LINEAR * z - LOGISTIC_QUADRATIC * z * z);
        round_to((1.0 - tail).min(MAX_SIGNIFICANCE), 4)
    }

    /// Relative change in conversion rate of `variant` over `control`, in percent.
    pub fn lift(&self, control: &Variant, variant: &Variant) -> f64 {
        let base = self.conversion_rate(control);
        if base == 0.0 {
            return 0.0;
        }
        round_to((self.conversion_rate(variant) - base) / base * 100.0, 2)
    }

    /// Variant with the strictly highest conversion rate; ties keep the first seen.
    pub fn find_winner<'a>(&self, variants: &'a [Variant]) -> Option<&'a Variant> {
        let mut best: Option<(&Variant, f64)> = None;
        for variant in variants {
            let rate = self.conversion_rate(variant);
            match best {
                Some((_, best_rate)) if rate <= best_rate => {}
                _ => best = Some((variant, rate)),
            }
        }
        best.map(|(variant, _)| variant)
    }

    /// Per-variant flags, or a single experiment-wide entry when nothing is flagged.
    pub fn recommendations(&self, variants: &[Variant]) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for variant in variants {
            if variant.impressions < self.config.min_sample_size {
                recommendations.push(Recommendation::new(
                    Some(variant.id.clone()),
                    RecommendationKind::InsufficientSample,
                    format!(
                        "Variant '{}' has {} impressions; sample size too small (need at least {})",
                        variant.name, variant.impressions, self.config.min_sample_size
                    ),
                ));
            }

            let rate = self.conversion_rate(variant);
            if rate < self.config.low_conversion_rate {
                recommendations.push(Recommendation::new(
                    Some(variant.id.clone()),
                    RecommendationKind::LowConversionRate,
                    format!(
                        "Variant '{}' has a low conversion rate of {rate}% (below {}%)",
                        variant.name, self.config.low_conversion_rate
                    ),
                ));
            }
        }

        if recommendations.is_empty() {
            recommendations.push(Recommendation::new(
                None,
                RecommendationKind::PerformingWell,
                "All variants are performing well".to_string(),
            ));
        }

        recommendations
    }

    /// Derived metrics for one variant.
    pub fn variant_report(&self, variant: &Variant) -> VariantReport {
        VariantReport {
            id: variant.id.clone(),
            name: variant.name.clone(),
            impressions: variant.impressions,
            conversion_rate: self.conversion_rate(variant),
            ctr: self.ctr(variant),
            aov: self.aov(variant),
            confidence_interval: self.confidence_interval(variant),
        }
    }

    /// Build the full report. The first variant is the control and is
    /// compared against the second.
    #[instrument(skip_all, fields(variants = variants.len()))]
    pub fn evaluate(&self, variants: &[Variant]) -> AbTestReport {
        let per_variant = variants.iter().map(|v| self.variant_report(v)).collect();
        let winner_id = self.find_winner(variants).map(|v| v.id.clone());

        let (significance, lift) = match variants {
            [control, variant, ..] => (
                Some(self.significance(control, variant)),
                Some(self.lift(control, variant)),
            ),
            _ => (None, None),
        };
        let is_significant =
            significance.is_some_and(|s| s >= self.config.significance_threshold);

        debug!(
            winner = winner_id.as_deref().unwrap_or("none"),
            significance = significance.unwrap_or_default(),
            is_significant,
            "evaluated experiment"
        );

        AbTestReport {
            per_variant,
            winner_id,
            significance,
            lift,
            is_significant,
            recommendations: self.recommendations(variants),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: &str, impressions: u64, conversions: u64) -> Variant {
        Variant::new(id, id.to_uppercase()).with_counts(impressions, 0, conversions)
    }

    #[test]
    fn test_rates_scenario() {
        let eval = AbTestEvaluator::default();
        let v = Variant::new("a", "A")
            .with_counts(200, 40, 20)
            .with_revenue(1000.0);
        assert!((eval.conversion_rate(&v) - 10.0).abs() < f64::EPSILON);
        assert!((eval.ctr(&v) - 20.0).abs() < f64::EPSILON);
        assert!((eval.aov(&v) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rates_round_to_two_decimals() {
        let eval = AbTestEvaluator::default();
        let v = variant("a", 3, 1);
        assert!((eval.conversion_rate(&v) - 33.33).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_guards() {
        let eval = AbTestEvaluator::default();
        let empty = Variant::new("a", "A").with_revenue(10.0);
        assert_eq!(eval.conversion_rate(&empty), 0.0);
        assert_eq!(eval.ctr(&empty), 0.0);
        assert_eq!(eval.aov(&empty), 0.0);
        assert_eq!(eval.confidence_interval(&empty), ConfidenceInterval::default());
    }

    #[test]
    fn test_confidence_interval() {
        let eval = AbTestEvaluator::default();
        // p = 0.1, margin = 1.96 * sqrt(0.09 / 100) = 0.0588
        let ci = eval.confidence_interval(&variant("a", 100, 10));
        assert!((ci.lower - 4.12).abs() < 1e-9);
        assert!((ci.upper - 15.88).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_interval_clamped() {
        let eval = AbTestEvaluator::default();
        let ci = eval.confidence_interval(&variant("a", 10, 0));
        assert_eq!(ci, ConfidenceInterval { lower: 0.0, upper: 0.0 });

        let ci = eval.confidence_interval(&variant("b", 20, 1));
        assert_eq!(ci.lower, 0.0);
        assert!(ci.upper > 5.0);
    }

    #[test]
    fn test_significance_zero_impressions() {
        let eval = AbTestEvaluator::default();
        let sig = eval.significance(&variant("a", 0, 0), &variant("b", 100, 10));
        assert_eq!(sig, 0.0);
    }

    #[test]
    fn test_significance_zero_standard_error() {
        let eval = AbTestEvaluator::default();
        assert_eq!(eval.significance(&variant("a", 50, 0), &variant("b", 80, 0)), 0.0);
        assert_eq!(eval.significance(&variant("a", 50, 50), &variant("b", 80, 80)), 0.0);
    }

    #[test]
    fn test_significance_identical_rates() {
        let eval = AbTestEvaluator::default();
        let sig = eval.significance(&variant("a", 1000, 100), &variant("b", 1000, 100));
        assert!((sig - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_significance_moderate_difference() {
        let eval = AbTestEvaluator::default();
        // z ≈ 2.10
        let sig = eval.significance(&variant("a", 1000, 100), &variant("b", 1000, 130));
        assert!(sig > 0.96 && sig < 0.97, "got {sig}");
        let reversed = eval.significance(&variant("b", 1000, 130), &variant("a", 1000, 100));
        assert!((sig - reversed).abs() < f64::EPSILON);
    }

    #[test]
    fn test_significance_capped() {
        let eval = AbTestEvaluator::default();
        let sig = eval.significance(&variant("a", 10_000, 100), &variant("b", 10_000, 900));
        assert!((sig - 0.99).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lift() {
        let eval = AbTestEvaluator::default();
        assert!((eval.lift(&variant("a", 100, 10), &variant("b", 100, 15)) - 50.0).abs() < 1e-9);
        assert_eq!(eval.lift(&variant("a", 100, 0), &variant("b", 100, 15)), 0.0);
    }

    #[test]
    fn test_find_winner_ties_keep_first() {
        let eval = AbTestEvaluator::default();
        let a = variant("a", 100, 5);
        let b = variant("b", 200, 10);
        let c = variant("c", 100, 7);

        let abc = [a.clone(), b.clone(), c];
        assert_eq!(eval.find_winner(&abc).map(|v| v.id.as_str()), Some("c"));

        let ab = [a, b];
        assert_eq!(eval.find_winner(&ab).map(|v| v.id.as_str()), Some("a"));

        assert!(eval.find_winner(&[]).is_none());
    }

    #[test]
    fn test_recommendations_flags() {
        let eval = AbTestEvaluator::default();
        let recs = eval.recommendations(&[variant("small", 50, 25), variant("weak", 1000, 1)]);

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].variant_id.as_deref(), Some("small"));
        assert_eq!(recs[0].kind, RecommendationKind::InsufficientSample);
        assert_eq!(recs[1].variant_id.as_deref(), Some("weak"));
        assert_eq!(recs[1].kind, RecommendationKind::LowConversionRate);
    }

    #[test]
    fn test_recommendations_performing_well() {
        let eval = AbTestEvaluator::default();
        let recs = eval.recommendations(&[variant("a", 500, 50)]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::PerformingWell);
        assert!(recs[0].variant_id.is_none());
    }

    #[test]
    fn test_custom_thresholds() {
        let eval = AbTestEvaluator::new(AbTestConfig {
            min_sample_size: 1000,
            low_conversion_rate: 0.0,
            significance_threshold: 0.5,
        });
        let recs = eval.recommendations(&[variant("a", 500, 50)]);
        assert_eq!(recs[0].kind, RecommendationKind::InsufficientSample);

        let report = eval.evaluate(&[variant("a", 1000, 100), variant("b", 1000, 100)]);
        assert!(report.is_significant);
    }

    #[test]
    fn test_evaluate_single_variant() {
        let eval = AbTestEvaluator::default();
        let report = eval.evaluate(&[variant("only", 400, 40)]);
        assert_eq!(report.per_variant.len(), 1);
        assert_eq!(report.winner_id.as_deref(), Some("only"));
        assert!(report.significance.is_none());
        assert!(report.lift.is_none());
        assert!(!report.is_significant);
    }

    #[test]
    fn test_evaluate_empty() {
        let report = AbTestEvaluator::default().evaluate(&[]);
        assert!(report.per_variant.is_empty());
        assert!(report.winner_id.is_none());
        assert_eq!(report.recommendations[0].kind, RecommendationKind::PerformingWell);
    }
}
