//! Health score tuning

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisError, AnalysisResult};
use crate::journal::{MAX_SEVERITY, MIN_SEVERITY};

/// Tunable parameters of the health score and insight rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Logging target the frequency factor is normalized against
    pub expected_entries_per_day: f64,
    /// Score difference between window halves that counts as a change
    pub score_trend_threshold: f64,
    /// Average severity that raises the critical insight
    pub critical_average_severity: f64,
    /// Entries needed before the critical insight is considered
    pub critical_min_entries: usize,
    /// Severity at which a single observation counts as high
    pub high_severity: u8,
    /// Entries shown on the dashboard
    pub recent_entries_limit: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            expected_entries_per_day: 1.0,
            score_trend_threshold: 5.0,
            critical_average_severity: 7.0,
            critical_min_entries: 3,
            high_severity: 7,
            recent_entries_limit: 10,
        }
    }
}

impl ScoringConfig {
    /// Reject non-positive targets and out-of-range severities
    pub fn validate(&self) -> AnalysisResult<()> {
        let fail = |msg: String| Err(AnalysisError::Configuration(msg));

        if !(self.expected_entries_per_day > 0.0) {
            return fail(format!(
                "expected_entries_per_day must be positive, got {}",
                self.expected_entries_per_day
            ));
        }
        if !(self.score_trend_threshold >= 0.0) {
            return fail(format!(
                "score_trend_threshold must be >= 0, got {}",
                self.score_trend_threshold
            ));
        }
        if !(MIN_SEVERITY as f64..=MAX_SEVERITY as f64).contains(&self.critical_average_severity) {
            return fail(format!(
                "critical_average_severity must be within [{}, {}], got {}",
                MIN_SEVERITY, MAX_SEVERITY, self.critical_average_severity
            ));
        }
        if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&self.high_severity) {
            return fail(format!(
                "high_severity must be within [{}, {}], got {}",
                MIN_SEVERITY, MAX_SEVERITY, self.high_severity
            ));
        }
        Ok(())
    }
}
