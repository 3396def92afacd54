//! Trend detection
//!
//! Fits severity against elapsed days for every symptom with enough distinct
//! dated observations and classifies the slope.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::config::AnalysisConfig;
use super::series::SymptomSeries;
use super::stats::{linear_regression, round4, LinearFit};
use super::types::{Significance, TrendDirection, TrendResult};
use crate::journal::days_between;

/// A trend together with the fit it came from
///
/// Predictions extrapolate `fit` forward from `last_elapsed`.
#[derive(Debug, Clone, PartialEq)]
pub struct SymptomTrend {
    pub result: TrendResult,
    pub fit: LinearFit,
    /// Timestamp `x = 0` corresponds to
    pub origin: DateTime<Utc>,
    /// Elapsed days of the last observation
    pub last_elapsed: f64,
}

/// Compute trends for every eligible series, in symptom-name order
pub fn compute_trends(
    series: &BTreeMap<String, SymptomSeries>,
    config: &AnalysisConfig,
) -> Vec<SymptomTrend> {
    series
        .values()
        .filter_map(|s| fit_trend(s, config))
        .collect()
}

/// Fit a single series; `None` if it has too few distinct dates
pub fn fit_trend(series: &SymptomSeries, config: &AnalysisConfig) -> Option<SymptomTrend> {
    if series.distinct_dates() < config.min_trend_points {
        return None;
    }

    let origin = series.points.first()?.date;
    let xs: Vec<f64> = series
        .points
        .iter()
        .map(|p| days_between(origin, p.date))
        .collect();
    let ys: Vec<f64> = series.points.iter().map(|p| p.severity).collect();

    let fit = linear_regression(&xs, &ys)?;
    let last_elapsed = xs.last().copied().unwrap_or(0.0);
    let data_points = series.points.len();

    tracing::trace!(
        symptom = %series.name,
        slope = fit.slope,
        points = data_points,
        "Fitted symptom trend"
    );

    Some(SymptomTrend {
        result: TrendResult {
            symptom: series.name.clone(),
            direction: classify_direction(fit.slope, config),
            rate: round4(fit.slope),
            timeframe_days: (last_elapsed.ceil() as i64).max(1),
            significance: classify_significance(fit.slope, data_points, config),
            data_points,
            mean_severity: round4(series.mean_severity()),
            r_squared: round4(fit.r_squared),
        },
        fit,
        origin,
        last_elapsed,
    })
}

/// Classify a slope as increasing, decreasing or stable
pub fn classify_direction(slope: f64, config: &AnalysisConfig) -> TrendDirection {
    if slope > config.stable_slope {
        TrendDirection::Increasing
    } else if slope < -config.stable_slope {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

/// Bucket a slope by magnitude and supporting point count
pub fn classify_significance(slope: f64, points: usize, config: &AnalysisConfig) -> Significance {
    let magnitude = slope.abs();
    if magnitude >= config.high_slope && points >= config.high_min_points {
        Significance::High
    } else if magnitude >= config.medium_slope && points >= config.medium_min_points {
        Significance::Medium
    } else {
        Significance::Low
    }
}
