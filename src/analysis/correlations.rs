//! Correlation Engine
//!
//! Calculates Pearson correlation coefficients between every pair of
//! symptoms, pairing severities only within entries that record both.
//! Pairs are never aligned across entries.

use std::collections::BTreeMap;

use super::config::AnalysisConfig;
use super::series::SymptomSeries;
use super::stats::{is_constant, pearson_correlation, round4};
use super::types::{CorrelationDirection, CorrelationResult, Significance};

/// Calculate correlations for all eligible symptom pairs
///
/// Returns correlations sorted by absolute strength (strongest first), ties
/// broken by symptom names.
pub fn compute_correlations(
    series: &BTreeMap<String, SymptomSeries>,
    config: &AnalysisConfig,
) -> Vec<CorrelationResult> {
    let candidates = select_candidates(series, config);

    let by_entry: Vec<(&str, BTreeMap<usize, f64>)> = candidates
        .iter()
        .map(|s| (s.name.as_str(), s.severity_by_entry()))
        .collect();

    let mut correlations = Vec::new();

    for i in 0..by_entry.len() {
        for j in (i + 1)..by_entry.len() {
            let (a_name, a_values) = &by_entry[i];
            let (b_name, b_values) = &by_entry[j];

            let (aligned_a, aligned_b) = align_by_entry(a_values, b_values);

            if aligned_a.len() < config.min_cooccurrences {
                continue;
            }

            // Pearson is undefined when either side never varies
            if is_constant(&aligned_a) || is_constant(&aligned_b) {
                continue;
            }

            let r = round4(pearson_correlation(&aligned_a, &aligned_b));
            let sample_size = aligned_a.len();

            if r.abs() < config.medium_correlation && sample_size < config.noise_min_sample {
                continue;
            }

            correlations.push(CorrelationResult {
                symptom_a: a_name.to_string(),
                symptom_b: b_name.to_string(),
                coefficient: r,
                direction: if r >= 0.0 {
                    CorrelationDirection::Positive
                } else {
                    CorrelationDirection::Negative
                },
                sample_size,
                significance: correlation_significance(r, config),
            });
        }
    }

    correlations.sort_by(|a, b| {
        b.coefficient
            .abs()
            .partial_cmp(&a.coefficient.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.symptom_a.cmp(&b.symptom_a))
            .then_with(|| a.symptom_b.cmp(&b.symptom_b))
    });

    tracing::trace!(
        candidates = candidates.len(),
        reported = correlations.len(),
        "Computed symptom correlations"
    );

    correlations
}

/// Symptoms observed often enough to be paired, in name order
///
/// When more than `max_correlated_symptoms` qualify, the most frequently
/// observed ones are kept (ties broken by name).
fn select_candidates<'a>(
    series: &'a BTreeMap<String, SymptomSeries>,
    config: &AnalysisConfig,
) -> Vec<&'a SymptomSeries> {
    let mut candidates: Vec<&SymptomSeries> = series
        .values()
        .filter(|s| s.points.len() >= config.min_cooccurrences)
        .collect();

    if candidates.len() > config.max_correlated_symptoms {
        tracing::debug!(
            distinct = candidates.len(),
            cap = config.max_correlated_symptoms,
            "Capping symptom vocabulary for correlation"
        );
        candidates.sort_by(|a, b| {
            b.points
                .len()
                .cmp(&a.points.len())
                .then_with(|| a.name.cmp(&b.name))
        });
        candidates.truncate(config.max_correlated_symptoms);
        candidates.sort_by(|a, b| a.name.cmp(&b.name));
    }

    candidates
}

/// Pair the severities of two symptoms recorded in the same entries
fn align_by_entry(a: &BTreeMap<usize, f64>, b: &BTreeMap<usize, f64>) -> (Vec<f64>, Vec<f64>) {
    let mut aligned_a = Vec::new();
    let mut aligned_b = Vec::new();

    for (index, &a_val) in a {
        if let Some(&b_val) = b.get(index) {
            aligned_a.push(a_val);
            aligned_b.push(b_val);
        }
    }

    (aligned_a, aligned_b)
}

/// Bucket a coefficient by magnitude
pub fn correlation_significance(r: f64, config: &AnalysisConfig) -> Significance {
    let abs_r = r.abs();
    if abs_r >= config.high_correlation {
        Significance::High
    } else if abs_r >= config.medium_correlation {
        Significance::Medium
    } else {
        Significance::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::series::build_series;
    use crate::journal::HealthEntry;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::days(n)
    }

    fn correlate(entries: &[HealthEntry], config: &AnalysisConfig) -> Vec<CorrelationResult> {
        let refs: Vec<&HealthEntry> = entries.iter().collect();
        compute_correlations(&build_series(&refs), config)
    }

    fn pair_entries(pairs: &[(u8, u8)]) -> Vec<HealthEntry> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, &(h, n))| {
                HealthEntry::new(format!("e{}", i), day(i as i64))
                    .symptom("nausea", n)
                    .symptom("headache", h)
            })
            .collect()
    }

    #[test]
    fn test_correlation_significance() {
        let config = AnalysisConfig::default();
        assert_eq!(correlation_significance(0.8, &config), Significance::High);
        assert_eq!(correlation_significance(-0.7, &config), Significance::High);
        assert_eq!(correlation_significance(0.55, &config), Significance::Medium);
        assert_eq!(correlation_significance(-0.4, &config), Significance::Medium);
        assert_eq!(correlation_significance(0.2, &config), Significance::Low);
    }

    #[test]
    fn test_four_cooccurrences_strongly_positive() {
        let entries = pair_entries(&[(3, 4), (5, 6), (7, 8), (2, 3)]);
        let correlations = correlate(&entries, &AnalysisConfig::default());

        assert_eq!(correlations.len(), 1);
        let c = &correlations[0];
        assert_eq!(c.symptom_a, "headache");
        assert_eq!(c.symptom_b, "nausea");
        assert!(c.coefficient > 0.9);
        assert_eq!(c.sample_size, 4);
        assert_eq!(c.significance, Significance::High);
        assert_eq!(c.direction, CorrelationDirection::Positive);
    }

    #[test]
    fn test_identical_severities_give_exactly_one() {
        let entries = pair_entries(&[(2, 2), (6, 6), (4, 4)]);
        let correlations = correlate(&entries, &AnalysisConfig::default());

        assert_eq!(correlations[0].coefficient, 1.0);
        assert_eq!(correlations[0].significance, Significance::High);
    }

    #[test]
    fn test_fewer_than_three_cooccurrences_dropped() {
        let mut entries = pair_entries(&[(2, 3), (8, 9)]);
        // Plenty of separate observations, but only two shared entries
        for i in 0..5 {
            entries.push(HealthEntry::new(format!("h{}", i), day(10 + i)).symptom("headache", 5));
            entries.push(HealthEntry::new(format!("n{}", i), day(10 + i)).symptom("nausea", 5));
        }
        assert!(correlate(&entries, &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn test_weak_small_sample_dropped_as_noise() {
        // r is about -0.23 over 4 entries
        let entries = pair_entries(&[(1, 5), (2, 1), (3, 4), (4, 3)]);
        assert!(correlate(&entries, &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn test_weak_large_sample_reported_low() {
        let entries = pair_entries(&[(1, 5), (2, 1), (3, 4), (4, 3), (5, 3), (6, 5)]);
        let correlations = correlate(&entries, &AnalysisConfig::default());

        assert_eq!(correlations.len(), 1);
        assert_eq!(correlations[0].significance, Significance::Low);
        assert_eq!(correlations[0].sample_size, 6);
    }

    #[test]
    fn test_constant_side_skipped() {
        let entries = pair_entries(&[(3, 5), (5, 5), (7, 5)]);
        assert!(correlate(&entries, &AnalysisConfig::default()).is_empty());
    }

    #[test]
    fn test_min_cooccurrences_is_tunable() {
        let entries = pair_entries(&[(3, 4), (5, 6), (7, 8)]);
        let strict = AnalysisConfig {
            min_cooccurrences: 4,
            ..Default::default()
        };
        assert!(correlate(&entries, &strict).is_empty());
        assert_eq!(correlate(&entries, &AnalysisConfig::default()).len(), 1);
    }

    #[test]
    fn test_vocabulary_cap_keeps_most_frequent() {
        let mut entries = Vec::new();
        for i in 0..4 {
            entries.push(
                HealthEntry::new(format!("e{}", i), day(i))
                    .symptom("a", 1 + i as u8)
                    .symptom("b", 2 + i as u8)
                    .symptom("c", 9 - i as u8),
            );
        }
        // "c" loses one observation so it is the least frequent
        entries[3].symptoms.pop();

        let config = AnalysisConfig {
            max_correlated_symptoms: 2,
            ..Default::default()
        };
        let correlations = correlate(&entries, &config);

        assert_eq!(correlations.len(), 1);
        assert_eq!(correlations[0].symptom_a, "a");
        assert_eq!(correlations[0].symptom_b, "b");
    }

    #[test]
    fn test_sorted_by_strength() {
        let entries: Vec<HealthEntry> = [(1u8, 2u8, 5u8), (2, 4, 1), (3, 6, 4), (4, 8, 2), (5, 10, 3)]
            .iter()
            .enumerate()
            .map(|(i, &(a, b, c))| {
                HealthEntry::new(format!("e{}", i), day(i as i64))
                    .symptom("alpha", a)
                    .symptom("beta", b)
                    .symptom("gamma", c)
            })
            .collect();
        let correlations = correlate(&entries, &AnalysisConfig::default());

        assert_eq!(correlations[0].symptom_a, "alpha");
        assert_eq!(correlations[0].symptom_b, "beta");
        assert_eq!(correlations[0].coefficient, 1.0);
        for pair in correlations.windows(2) {
            assert!(pair[0].coefficient.abs() >= pair[1].coefficient.abs());
        }
    }
}
