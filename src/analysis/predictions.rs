//! Severity projections
//!
//! Extrapolates the trend fit of each meaningfully trending symptom and
//! checks whether it reaches the notable severity within the window ahead.

use super::config::AnalysisConfig;
use super::stats::round4;
use super::trends::SymptomTrend;
use super::types::{
    CorrelationResult, Likelihood, PredictionResult, Significance, TrendDirection,
};
use crate::journal::{MAX_SEVERITY, MIN_SEVERITY};

/// Project every non-stable trend of at least medium significance
///
/// `horizon_days` is the analysis window; `likely` means the projection is
/// at or above the notable severity within half of it, `possible` within
/// all of it.
pub fn predict(
    trends: &[SymptomTrend],
    correlations: &[CorrelationResult],
    horizon_days: i64,
    config: &AnalysisConfig,
) -> Vec<PredictionResult> {
    trends
        .iter()
        .filter(|t| t.result.direction != TrendDirection::Stable)
        .filter(|t| t.result.significance >= Significance::Medium)
        .map(|t| project(t, correlations, horizon_days, config))
        .collect()
}

fn project(
    trend: &SymptomTrend,
    correlations: &[CorrelationResult],
    horizon_days: i64,
    config: &AnalysisConfig,
) -> PredictionResult {
    let horizon = horizon_days as f64;
    let threshold = config.notable_severity;
    let at = |days_ahead: f64| trend.fit.predict(trend.last_elapsed + days_ahead);

    // Linear, so the maximum over [0, h] is at one of the ends
    let peak_within = |h: f64| at(0.0).max(at(h));

    let likelihood = if peak_within(horizon / 2.0) >= threshold {
        Likelihood::Likely
    } else if peak_within(horizon) >= threshold {
        Likelihood::Possible
    } else {
        Likelihood::Unlikely
    };

    let current = at(0.0);
    let days_to_threshold = if current >= threshold {
        Some(0.0)
    } else if trend.fit.slope > 0.0 {
        Some(round4((threshold - current) / trend.fit.slope))
    } else {
        None
    };

    PredictionResult {
        symptom: trend.result.symptom.clone(),
        likelihood,
        timeframe_days: horizon_days,
        confidence: round4(trend.fit.r_squared.clamp(0.0, 1.0)),
        projected_severity: round4(at(horizon).clamp(MIN_SEVERITY as f64, MAX_SEVERITY as f64)),
        days_to_threshold,
        factors: factors(trend, correlations, config),
    }
}

fn factors(
    trend: &SymptomTrend,
    correlations: &[CorrelationResult],
    config: &AnalysisConfig,
) -> Vec<String> {
    let result = &trend.result;
    let mut factors = vec![
        format!(
            "{} trend at {:+.2} severity/day ({} significance)",
            result.direction, result.rate, result.significance
        ),
        format!("{} observations over {} days", result.data_points, result.timeframe_days),
    ];

    let mut partners: Vec<(&str, f64)> = correlations
        .iter()
        .filter(|c| c.coefficient.abs() >= config.pattern_min_correlation)
        .filter_map(|c| c.partner_of(&result.symptom).map(|p| (p, c.coefficient)))
        .collect();
    partners.sort_by(|a, b| a.0.cmp(b.0));

    factors.extend(
        partners
            .into_iter()
            .map(|(partner, r)| format!("correlated with {} (r={:.2})", partner, r)),
    );

    factors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::series::build_series;
    use crate::analysis::trends::compute_trends;
    use crate::journal::HealthEntry;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::days(n)
    }

    fn trends_for(points: &[(i64, u8)]) -> Vec<SymptomTrend> {
        let entries: Vec<HealthEntry> = points
            .iter()
            .map(|&(d, s)| HealthEntry::new(format!("e{}", d), day(d)).symptom("headache", s))
            .collect();
        let refs: Vec<&HealthEntry> = entries.iter().collect();
        compute_trends(&build_series(&refs), &AnalysisConfig::default())
    }

    #[test]
    fn test_rising_symptom_crosses_soon() {
        // 3, 4, 5 on consecutive days: reaches 7 two days after the last point
        let trends = trends_for(&[(0, 3), (1, 4), (2, 5)]);
        let predictions = predict(&trends, &[], 30, &AnalysisConfig::default());

        assert_eq!(predictions.len(), 1);
        let p = &predictions[0];
        assert_eq!(p.likelihood, Likelihood::Likely);
        assert_eq!(p.days_to_threshold, Some(2.0));
        assert_eq!(p.confidence, 1.0);
        assert_eq!(p.projected_severity, 10.0);
        assert_eq!(p.timeframe_days, 30);
    }

    #[test]
    fn test_slow_rise_is_possible() {
        // +0.2/day, fitted 3.1 at the last point: reaches 7 after 19.5 days
        let trends = trends_for(&[(0, 2), (2, 2), (4, 3), (6, 3)]);
        let trend = &trends[0];
        assert_eq!(trend.result.significance, Significance::Medium);

        let predictions = predict(&trends, &[], 30, &AnalysisConfig::default());
        assert_eq!(predictions[0].days_to_threshold, Some(19.5));
        assert_eq!(predictions[0].likelihood, Likelihood::Possible);

        let predictions = predict(&trends, &[], 10, &AnalysisConfig::default());
        assert_eq!(predictions[0].likelihood, Likelihood::Unlikely);
    }

    #[test]
    fn test_falling_symptom_below_threshold_unlikely() {
        let trends = trends_for(&[(0, 6), (1, 5), (2, 4)]);
        let predictions = predict(&trends, &[], 30, &AnalysisConfig::default());

        assert_eq!(predictions[0].likelihood, Likelihood::Unlikely);
        assert_eq!(predictions[0].days_to_threshold, None);
        assert_eq!(predictions[0].projected_severity, 1.0);
    }

    #[test]
    fn test_falling_symptom_still_severe_is_likely() {
        let trends = trends_for(&[(0, 10), (1, 9), (2, 8)]);
        let predictions = predict(&trends, &[], 30, &AnalysisConfig::default());

        assert_eq!(predictions[0].likelihood, Likelihood::Likely);
        assert_eq!(predictions[0].days_to_threshold, Some(0.0));
    }

    #[test]
    fn test_low_significance_not_predicted() {
        // Only two points: significance stays low
        let trends = trends_for(&[(0, 2), (1, 9)]);
        assert!(predict(&trends, &[], 30, &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn test_factors_name_correlated_partners() {
        let trends = trends_for(&[(0, 3), (1, 4), (2, 5)]);
        let correlations = vec![CorrelationResult {
            symptom_a: "headache".to_string(),
            symptom_b: "nausea".to_string(),
            coefficient: 0.82,
            direction: crate::analysis::types::CorrelationDirection::Positive,
            sample_size: 3,
            significance: Significance::High,
        }];
        let predictions = predict(&trends, &correlations, 30, &AnalysisConfig::default());
        let factors = &predictions[0].factors;

        assert_eq!(factors[0], "increasing trend at +1.00 severity/day (medium significance)");
        assert_eq!(factors[1], "3 observations over 2 days");
        assert_eq!(factors[2], "correlated with nausea (r=0.82)");
    }
}
