//! Analysis summary line
//!
//! Built from counts only.

use super::types::{
    CorrelationResult, PatternResult, PredictionResult, TrendDirection, TrendResult,
};

/// Summary for a window without any entries
pub fn empty_summary(timeframe_days: i64) -> String {
    format!(
        "No data available: no health entries in the last {} days.",
        timeframe_days
    )
}

/// Summarize the result counts of one analysis
pub fn summarize(
    trends: &[TrendResult],
    correlations: &[CorrelationResult],
    patterns: &[PatternResult],
    predictions: &[PredictionResult],
    entry_count: usize,
    timeframe_days: i64,
) -> String {
    if entry_count == 0 {
        return empty_summary(timeframe_days);
    }

    let count = |direction: TrendDirection| trends.iter().filter(|t| t.direction == direction).count();

    format!(
        "{} detected ({} increasing, {} decreasing, {} stable), {}, {}, {}; analysis based on {} over {} days.",
        plural(trends.len(), "trend"),
        count(TrendDirection::Increasing),
        count(TrendDirection::Decreasing),
        count(TrendDirection::Stable),
        plural(correlations.len(), "correlation"),
        plural(patterns.len(), "pattern"),
        plural(predictions.len(), "prediction"),
        plural(entry_count, "entry"),
        timeframe_days
    )
}

fn plural(n: usize, noun: &str) -> String {
    match (n, noun.strip_suffix('y')) {
        (1, _) => format!("1 {}", noun),
        (_, Some(stem)) => format!("{} {}ies", n, stem),
        _ => format!("{} {}s", n, noun),
    }
}
