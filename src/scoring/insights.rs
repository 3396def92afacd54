//! Rule-based insights
//!
//! Every insight comes from a fixed rule over counts, averages and the
//! analysis trends. Nothing here generates free text beyond the templates.

use chrono::{DateTime, Utc};

use super::config::ScoringConfig;
use super::score::average_severity;
use super::types::{Insight, InsightKind, InsightSeverity};
use crate::analysis::{PatternAnalysis, Significance, TrendDirection};
use crate::journal::{days_between, HealthEntry};

/// Derive insights for the entries of one window
///
/// `entries` must already be restricted to the window `analysis` covers.
pub fn derive_insights(
    entries: &[&HealthEntry],
    analysis: &PatternAnalysis,
    reference_time: DateTime<Utc>,
    config: &ScoringConfig,
) -> Vec<Insight> {
    if entries.is_empty() {
        return vec![start_tracking()];
    }

    let mut insights = vec![entries_recorded(entries, reference_time)];

    insights.extend(
        analysis
            .trends
            .iter()
            .filter(|t| t.direction == TrendDirection::Increasing)
            .filter(|t| t.significance == Significance::High)
            .map(|t| Insight {
                id: format!("worsening-{}", t.symptom.replace(' ', "-")),
                kind: InsightKind::Trend,
                title: format!("Worsening {}", t.symptom),
                description: format!(
                    "{} severity is rising by {:.2} points per day across {} observations.",
                    t.symptom, t.rate, t.data_points
                ),
                severity: InsightSeverity::Warning,
                actionable: true,
                recommendation: Some(format!(
                    "Note what precedes {} episodes and share the trend with a healthcare professional.",
                    t.symptom
                )),
            }),
    );

    if entries.len() >= config.critical_min_entries {
        if let Some(avg) = average_severity(entries) {
            if avg >= config.critical_average_severity {
                insights.push(Insight {
                    id: "high_average_severity".to_string(),
                    kind: InsightKind::Pattern,
                    title: "Persistently High Symptom Severity".to_string(),
                    description: format!(
                        "Average symptom severity is {:.1} across {} entries.",
                        avg,
                        entries.len()
                    ),
                    severity: InsightSeverity::Critical,
                    actionable: true,
                    recommendation: Some(
                        "Consider seeking medical advice about these symptoms.".to_string(),
                    ),
                });
            }
        }
    }

    let high_severity_entries = entries
        .iter()
        .filter(|e| e.max_severity().is_some_and(|s| s >= config.high_severity))
        .count();

    if high_severity_entries > 0 {
        insights.push(Insight {
            id: "high_severity".to_string(),
            kind: InsightKind::Pattern,
            title: "High Severity Symptoms Detected".to_string(),
            description: format!(
                "{} {} high-severity symptoms ({}+ on the pain scale).",
                high_severity_entries,
                if high_severity_entries == 1 {
                    "entry contains"
                } else {
                    "entries contain"
                },
                config.high_severity
            ),
            severity: InsightSeverity::Warning,
            actionable: true,
            recommendation: Some(
                "Consider consulting with a healthcare professional for persistent high-severity symptoms."
                    .to_string(),
            ),
        });
    }

    insights
}

fn start_tracking() -> Insight {
    Insight {
        id: "no_entries".to_string(),
        kind: InsightKind::Pattern,
        title: "Start Tracking Your Health".to_string(),
        description: "Create your first health entry to begin tracking symptoms and patterns."
            .to_string(),
        severity: InsightSeverity::Info,
        actionable: true,
        recommendation: Some("Record your first symptoms to get started.".to_string()),
    }
}

fn entries_recorded(entries: &[&HealthEntry], reference_time: DateTime<Utc>) -> Insight {
    let oldest = entries.iter().map(|e| e.date).min().unwrap_or(reference_time);
    let days = (days_between(oldest, reference_time).ceil() as i64).max(1);

    Insight {
        id: "recent_entries".to_string(),
        kind: InsightKind::Pattern,
        title: if entries.len() == 1 {
            "1 Health Entry Recorded".to_string()
        } else {
            format!("{} Health Entries Recorded", entries.len())
        },
        description: format!(
            "You've been tracking your health for {} day{}.",
            days,
            if days == 1 { "" } else { "s" }
        ),
        severity: InsightSeverity::Info,
        actionable: true,
        recommendation: Some("Continue tracking to identify patterns and trends.".to_string()),
    }
}
