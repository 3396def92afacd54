//! Health score
//!
//! The overall score is the severity factor alone:
//! `max(10, 100 - average_severity * 8)`. Frequency and consistency are
//! reported next to it as weighted factors.

use chrono::{DateTime, Utc};

use super::config::ScoringConfig;
use super::types::{FactorTrend, HealthFactor, HealthScore, ScoreTrend};
use crate::analysis::stats::{coefficient_of_variation, mean, round4};
use crate::journal::{days_between, HealthEntry, TimeWindow};

pub const SEVERITY_WEIGHT: f64 = 0.6;
pub const FREQUENCY_WEIGHT: f64 = 0.2;
pub const CONSISTENCY_WEIGHT: f64 = 0.2;

/// Score of a window without entries
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Assumed when entries exist but carry no symptoms
const DEFAULT_AVERAGE_SEVERITY: f64 = 5.0;

const MIN_SCORE: f64 = 10.0;
const MAX_SCORE: f64 = 100.0;

/// Mean severity over every symptom observation of the entries
pub fn average_severity(entries: &[&HealthEntry]) -> Option<f64> {
    let severities: Vec<f64> = entries
        .iter()
        .flat_map(|e| e.symptoms.iter())
        .map(|s| s.severity as f64)
        .collect();
    mean(&severities)
}

/// Severity inverted onto a 10 to 100 scale
pub fn severity_score(entries: &[&HealthEntry]) -> f64 {
    let avg = average_severity(entries).unwrap_or(DEFAULT_AVERAGE_SEVERITY);
    (MAX_SCORE - avg * 8.0).max(MIN_SCORE)
}

/// Entry count against the daily logging target, capped at 100
pub fn frequency_score(count: usize, days: f64, config: &ScoringConfig) -> f64 {
    if days <= 0.0 {
        return 0.0;
    }
    (MAX_SCORE * count as f64 / (days * config.expected_entries_per_day)).min(MAX_SCORE)
}

/// Inverse coefficient of variation of the gaps between entries
///
/// Evenly spaced entries score 100. Fewer than two entries have no gaps
/// and score 0.
pub fn consistency_score(entries: &[&HealthEntry]) -> f64 {
    if entries.len() < 2 {
        return 0.0;
    }

    let mut dates: Vec<DateTime<Utc>> = entries.iter().map(|e| e.date).collect();
    dates.sort();
    let gaps: Vec<f64> = dates.windows(2).map(|w| days_between(w[0], w[1])).collect();

    match coefficient_of_variation(&gaps) {
        Some(cv) => MAX_SCORE / (1.0 + cv),
        // Every entry at the same instant
        None => MAX_SCORE,
    }
}

/// Score the entries of `window`
///
/// `entries` must already be restricted to the window.
pub fn compute_score(
    entries: &[&HealthEntry],
    window: TimeWindow,
    config: &ScoringConfig,
) -> HealthScore {
    if entries.is_empty() {
        return HealthScore {
            overall: NEUTRAL_SCORE,
            trend: ScoreTrend::Stable,
            factors: Vec::new(),
            last_updated: window.end,
        };
    }

    let midpoint = window.midpoint();
    let (first, second): (Vec<&HealthEntry>, Vec<&HealthEntry>) =
        entries.iter().copied().partition(|e| e.date < midpoint);
    let half_days = window.length_days() / 2.0;
    let threshold = config.score_trend_threshold;

    let severity = severity_score(entries);
    let severity_trend = if first.is_empty() || second.is_empty() {
        FactorTrend::Stable
    } else {
        factor_trend(severity_score(&first), severity_score(&second), threshold)
    };

    let frequency_trend = factor_trend(
        frequency_score(first.len(), half_days, config),
        frequency_score(second.len(), half_days, config),
        threshold,
    );

    let consistency_trend = if first.len() < 2 || second.len() < 2 {
        FactorTrend::Stable
    } else {
        factor_trend(consistency_score(&first), consistency_score(&second), threshold)
    };

    let trend = match severity_trend {
        FactorTrend::Up => ScoreTrend::Improving,
        FactorTrend::Down => ScoreTrend::Declining,
        FactorTrend::Stable => ScoreTrend::Stable,
    };

    HealthScore {
        overall: round4(severity),
        trend,
        factors: vec![
            HealthFactor {
                name: "Symptom Severity".to_string(),
                score: round4(severity),
                weight: SEVERITY_WEIGHT,
                trend: severity_trend,
            },
            HealthFactor {
                name: "Entry Frequency".to_string(),
                score: round4(frequency_score(entries.len(), window.length_days(), config)),
                weight: FREQUENCY_WEIGHT,
                trend: frequency_trend,
            },
            HealthFactor {
                name: "Consistency".to_string(),
                score: round4(consistency_score(entries)),
                weight: CONSISTENCY_WEIGHT,
                trend: consistency_trend,
            },
        ],
        last_updated: window.end,
    }
}

fn factor_trend(before: f64, after: f64, threshold: f64) -> FactorTrend {
    let change = after - before;
    if change > threshold {
        FactorTrend::Up
    } else if change < -threshold {
        FactorTrend::Down
    } else {
        FactorTrend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::days(n)
    }

    fn score(entries: &[HealthEntry], days: i64, reference: DateTime<Utc>) -> HealthScore {
        let refs: Vec<&HealthEntry> = entries.iter().collect();
        compute_score(&refs, TimeWindow::ending_at(reference, days), &ScoringConfig::default())
    }

    #[test]
    fn test_empty_window_is_neutral() {
        let result = score(&[], 30, day(30));
        assert_eq!(result.overall, 50.0);
        assert_eq!(result.trend, ScoreTrend::Stable);
        assert!(result.factors.is_empty());
        assert_eq!(result.last_updated, day(30));
    }

    #[test]
    fn test_entries_without_symptoms_score_sixty() {
        let entries = vec![HealthEntry::new("a", day(29)).mood(4)];
        assert_eq!(score(&entries, 30, day(30)).overall, 60.0);
    }

    #[test]
    fn test_severity_formula() {
        let entries = vec![
            HealthEntry::new("a", day(28)).symptom("headache", 2).symptom("cough", 4),
            HealthEntry::new("b", day(29)).symptom("headache", 3),
        ];
        // Average 3
        assert_eq!(score(&entries, 30, day(30)).overall, 76.0);

        let entries = vec![HealthEntry::new("a", day(29)).symptom("migraine", 10)];
        assert_eq!(score(&entries, 30, day(30)).overall, 20.0);
    }

    #[test]
    fn test_frequency_score() {
        let config = ScoringConfig::default();
        assert_eq!(frequency_score(15, 30.0, &config), 50.0);
        assert_eq!(frequency_score(45, 30.0, &config), 100.0);
        assert_eq!(frequency_score(3, 0.0, &config), 0.0);
    }

    #[test]
    fn test_consistency_score() {
        let even: Vec<HealthEntry> = (0..4)
            .map(|i| HealthEntry::new(format!("e{}", i), day(i * 2)))
            .collect();
        let refs: Vec<&HealthEntry> = even.iter().collect();
        assert_eq!(consistency_score(&refs), 100.0);
        assert_eq!(consistency_score(&refs[..1]), 0.0);

        // Gaps of 1 and 3 days: cv = 0.5
        let uneven = vec![
            HealthEntry::new("a", day(0)),
            HealthEntry::new("b", day(1)),
            HealthEntry::new("c", day(4)),
        ];
        let refs: Vec<&HealthEntry> = uneven.iter().collect();
        assert_eq!(round4(consistency_score(&refs)), 66.6667);
    }

    #[test]
    fn test_improving_second_half() {
        let entries = vec![
            HealthEntry::new("a", day(2)).symptom("back pain", 8),
            HealthEntry::new("b", day(5)).symptom("back pain", 8),
            HealthEntry::new("c", day(20)).symptom("back pain", 2),
            HealthEntry::new("d", day(25)).symptom("back pain", 2),
        ];
        let result = score(&entries, 30, day(30));

        assert_eq!(result.trend, ScoreTrend::Improving);
        assert_eq!(result.factors[0].name, "Symptom Severity");
        assert_eq!(result.factors[0].trend, FactorTrend::Up);
        assert_eq!(result.factors[1].trend, FactorTrend::Stable);
        // Average 5 over the whole window
        assert_eq!(result.overall, 60.0);
    }

    #[test]
    fn test_declining_second_half() {
        let entries = vec![
            HealthEntry::new("a", day(3)).symptom("nausea", 1),
            HealthEntry::new("b", day(27)).symptom("nausea", 9),
            HealthEntry::new("c", day(28)).symptom("nausea", 9),
        ];
        let result = score(&entries, 30, day(30));

        assert_eq!(result.trend, ScoreTrend::Declining);
        // One entry before the midpoint, two after
        assert_eq!(result.factors[1].trend, FactorTrend::Up);
    }

    #[test]
    fn test_factor_weights() {
        let entries = vec![HealthEntry::new("a", day(29)).symptom("cough", 3)];
        let weights: Vec<f64> = score(&entries, 30, day(30))
            .factors
            .iter()
            .map(|f| f.weight)
            .collect();
        assert_eq!(weights, vec![0.6, 0.2, 0.2]);
    }
}
