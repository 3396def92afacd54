//! Health scorer
//!
//! Front door for scores, insights and the dashboard. Validation mirrors
//! the pattern engine: the timeframe first, then every entry of the batch.

use chrono::{DateTime, Utc};

use super::config::ScoringConfig;
use super::insights::derive_insights;
use super::score::compute_score;
use super::types::{Dashboard, HealthScore, Insight};
use crate::analysis::series::window_entries;
use crate::analysis::{check_timeframe, AnalysisResult, PatternEngine};
use crate::journal::{validate_entries, HealthEntry, TimeWindow};

/// Scores journals and derives insights
#[derive(Debug, Clone, Default)]
pub struct HealthScorer {
    engine: PatternEngine,
    config: ScoringConfig,
}

impl HealthScorer {
    /// Create a scorer on top of an engine
    pub fn new(engine: PatternEngine, config: ScoringConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(Self { engine, config })
    }

    pub fn engine(&self) -> &PatternEngine {
        &self.engine
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Health score over the `timeframe_days` before `reference_time`
    pub fn score(
        &self,
        entries: &[HealthEntry],
        timeframe_days: i64,
        reference_time: DateTime<Utc>,
    ) -> AnalysisResult<HealthScore> {
        check_timeframe(timeframe_days)?;
        validate_entries(entries)?;

        let window = TimeWindow::ending_at(reference_time, timeframe_days);
        let windowed = window_entries(entries, window);
        Ok(compute_score(&windowed, window, &self.config))
    }

    /// Rule-based insights over the `timeframe_days` before `reference_time`
    pub fn insights(
        &self,
        entries: &[HealthEntry],
        timeframe_days: i64,
        reference_time: DateTime<Utc>,
    ) -> AnalysisResult<Vec<Insight>> {
        let analysis = self.engine.analyze(entries, timeframe_days, reference_time)?;

        let window = TimeWindow::ending_at(reference_time, timeframe_days);
        let windowed = window_entries(entries, window);
        Ok(derive_insights(&windowed, &analysis, reference_time, &self.config))
    }

    /// Recent entries, analysis, score and insights for one window
    pub fn dashboard(
        &self,
        entries: &[HealthEntry],
        timeframe_days: i64,
        reference_time: DateTime<Utc>,
    ) -> AnalysisResult<Dashboard> {
        let analysis = self.engine.analyze(entries, timeframe_days, reference_time)?;

        let window = TimeWindow::ending_at(reference_time, timeframe_days);
        let windowed = window_entries(entries, window);
        let health_score = compute_score(&windowed, window, &self.config);
        let insights = derive_insights(&windowed, &analysis, reference_time, &self.config);

        let mut recent_entries: Vec<HealthEntry> = windowed.iter().map(|e| (*e).clone()).collect();
        recent_entries.sort_by(|a, b| b.date.cmp(&a.date));
        recent_entries.truncate(self.config.recent_entries_limit);

        tracing::debug!(
            entries = windowed.len(),
            overall = health_score.overall,
            insights = insights.len(),
            "Built dashboard"
        );

        Ok(Dashboard {
            recent_entries,
            pattern_analysis: analysis,
            health_score,
            insights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisError;
    use crate::scoring::types::ScoreTrend;
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::days(n)
    }

    fn journal(n: i64) -> Vec<HealthEntry> {
        (0..n)
            .map(|i| HealthEntry::new(format!("e{}", i), day(i)).symptom("cough", 4))
            .collect()
    }

    #[test]
    fn test_score_validates_timeframe() {
        let scorer = HealthScorer::default();
        assert!(matches!(
            scorer.score(&journal(3), 0, day(3)),
            Err(AnalysisError::Configuration(_))
        ));
    }

    #[test]
    fn test_score_rejects_invalid_entries() {
        let scorer = HealthScorer::default();
        let mut entries = journal(3);
        entries.push(HealthEntry::new("bad", day(1)).symptom("cough", 0));

        assert!(matches!(
            scorer.score(&entries, 30, day(3)),
            Err(AnalysisError::Validation(_))
        ));
        assert!(scorer.insights(&entries, 30, day(3)).is_err());
    }

    #[test]
    fn test_score_ignores_entries_outside_window() {
        let scorer = HealthScorer::default();
        let result = scorer.score(&journal(3), 30, day(100)).unwrap();

        assert_eq!(result.overall, 50.0);
        assert_eq!(result.trend, ScoreTrend::Stable);
    }

    #[test]
    fn test_dashboard_keeps_ten_newest() {
        let scorer = HealthScorer::default();
        let dashboard = scorer.dashboard(&journal(14), 30, day(14)).unwrap();

        assert_eq!(dashboard.recent_entries.len(), 10);
        assert_eq!(dashboard.recent_entries[0].id, "e13");
        assert_eq!(dashboard.recent_entries[9].id, "e4");
        assert_eq!(dashboard.pattern_analysis.entry_count, 14);
        assert_eq!(dashboard.health_score.overall, 68.0);
        assert_eq!(dashboard.insights[0].id, "recent_entries");
    }

    #[test]
    fn test_dashboard_on_empty_journal() {
        let dashboard = HealthScorer::default().dashboard(&[], 30, day(0)).unwrap();

        assert!(dashboard.recent_entries.is_empty());
        assert!(dashboard.pattern_analysis.is_empty());
        assert_eq!(dashboard.insights[0].id, "no_entries");
    }
}
