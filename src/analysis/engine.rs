//! Pattern Engine
//!
//! Wires windowing, series construction, trends, correlations, patterns,
//! predictions and the summary into one call. The engine keeps no state
//! between calls and never touches its input.

use chrono::{DateTime, Utc};

use super::config::{check_timeframe, AnalysisConfig};
use super::correlations::compute_correlations;
use super::error::AnalysisResult;
use super::patterns::detect_patterns;
use super::predictions::predict;
use super::series::{build_series, window_entries};
use super::summary::{empty_summary, summarize};
use super::trends::compute_trends;
use super::types::PatternAnalysis;
use crate::journal::{validate_entries, HealthEntry, TimeWindow};

/// Deterministic pattern/trend/correlation engine
#[derive(Debug, Clone, Default)]
pub struct PatternEngine {
    config: AnalysisConfig,
}

impl PatternEngine {
    /// Create an engine with validated thresholds
    pub fn new(config: AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Thresholds in use
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze the entries dated within `timeframe_days` before `reference_time`
    ///
    /// The timeframe is checked before any entry is looked at. Every entry
    /// of the batch is validated, including those outside the window, and a
    /// single invalid entry fails the whole call.
    pub fn analyze(
        &self,
        entries: &[HealthEntry],
        timeframe_days: i64,
        reference_time: DateTime<Utc>,
    ) -> AnalysisResult<PatternAnalysis> {
        check_timeframe(timeframe_days)?;
        validate_entries(entries)?;

        let window = TimeWindow::ending_at(reference_time, timeframe_days);
        let windowed = window_entries(entries, window);

        if windowed.is_empty() {
            tracing::debug!(
                total = entries.len(),
                timeframe_days,
                "No entries inside analysis window"
            );
            return Ok(PatternAnalysis {
                summary: empty_summary(timeframe_days),
                trends: Vec::new(),
                correlations: Vec::new(),
                patterns: Vec::new(),
                predictions: Vec::new(),
                entry_count: 0,
                timeframe_days,
                reference_time,
            });
        }

        let series = build_series(&windowed);
        let symptom_trends = compute_trends(&series, &self.config);
        let correlations = compute_correlations(&series, &self.config);
        let patterns = detect_patterns(&symptom_trends, &correlations, &self.config);
        let predictions = predict(&symptom_trends, &correlations, timeframe_days, &self.config);
        let trends: Vec<_> = symptom_trends.into_iter().map(|t| t.result).collect();

        let summary = summarize(
            &trends,
            &correlations,
            &patterns,
            &predictions,
            windowed.len(),
            timeframe_days,
        );

        tracing::debug!(
            entries = windowed.len(),
            symptoms = series.len(),
            trends = trends.len(),
            correlations = correlations.len(),
            patterns = patterns.len(),
            predictions = predictions.len(),
            "Pattern analysis complete"
        );

        Ok(PatternAnalysis {
            summary,
            trends,
            correlations,
            patterns,
            predictions,
            entry_count: windowed.len(),
            timeframe_days,
            reference_time,
        })
    }
}

/// Analyze with the default thresholds
pub fn analyze(
    entries: &[HealthEntry],
    timeframe_days: i64,
    reference_time: DateTime<Utc>,
) -> AnalysisResult<PatternAnalysis> {
    PatternEngine::default().analyze(entries, timeframe_days, reference_time)
}
