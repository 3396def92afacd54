//! Pattern clustering
//!
//! A pattern is a symptom with a non-stable trend plus every symptom it is
//! meaningfully correlated with. Trends without correlations, and
//! correlations without a trend, stay in their own result lists.

use super::config::AnalysisConfig;
use super::stats::round4;
use super::trends::SymptomTrend;
use super::types::{
    CorrelationResult, PatternKind, PatternLink, PatternResult, TrendDirection,
};

/// Build one pattern per trending symptom that has qualifying correlations
pub fn detect_patterns(
    trends: &[SymptomTrend],
    correlations: &[CorrelationResult],
    config: &AnalysisConfig,
) -> Vec<PatternResult> {
    trends
        .iter()
        .map(|t| &t.result)
        .filter(|t| t.direction != TrendDirection::Stable)
        .filter_map(|trend| {
            let mut links: Vec<PatternLink> = correlations
                .iter()
                .filter(|c| c.coefficient.abs() >= config.pattern_min_correlation)
                .filter_map(|c| {
                    c.partner_of(&trend.symptom).map(|partner| PatternLink {
                        symptom: partner.to_string(),
                        coefficient: c.coefficient,
                    })
                })
                .collect();

            if links.is_empty() {
                return None;
            }

            links.sort_by(|a, b| a.symptom.cmp(&b.symptom));

            let confidence = round4(
                links.iter().map(|l| l.coefficient.abs()).sum::<f64>() / links.len() as f64,
            );

            let mut symptoms = vec![trend.symptom.clone()];
            symptoms.extend(links.iter().map(|l| l.symptom.clone()));

            let kind = match trend.direction {
                TrendDirection::Increasing => PatternKind::Escalating,
                _ => PatternKind::Easing,
            };

            Some(PatternResult {
                id: format!("pattern-{}", trend.symptom.replace(' ', "-")),
                kind,
                symptom: trend.symptom.clone(),
                symptoms,
                direction: trend.direction,
                rate: trend.rate,
                description: describe(&trend.symptom, trend.direction, trend.rate, &links),
                links,
                confidence,
                average_severity: trend.mean_severity,
            })
        })
        .collect()
}

fn describe(symptom: &str, direction: TrendDirection, rate: f64, links: &[PatternLink]) -> String {
    let partners = links
        .iter()
        .map(|l| format!("{} (r={:.2})", l.symptom, l.coefficient))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} is {} at {:+.2} severity/day and moves with {}",
        symptom, direction, rate, partners
    )
}
