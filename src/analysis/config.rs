//! Analysis thresholds
//!
//! Every cut-off the engine applies lives here so deployments can tune them
//! from the `[analysis]` table of the config file.

use serde::{Deserialize, Serialize};

use super::error::{AnalysisError, AnalysisResult};
use crate::journal::{MAX_SEVERITY, MIN_SEVERITY};

/// Longest accepted analysis window
pub const MAX_TIMEFRAME_DAYS: i64 = 3650;

/// Tunable thresholds for the pattern engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// |slope| (severity/day) at or below which a trend is `stable`
    pub stable_slope: f64,
    /// Minimum |slope| for `high` trend significance
    pub high_slope: f64,
    /// Minimum point count for `high` trend significance
    pub high_min_points: usize,
    /// Minimum |slope| for `medium` trend significance
    pub medium_slope: f64,
    /// Minimum point count for `medium` trend significance
    pub medium_min_points: usize,
    /// Distinct dated observations needed before a trend is fitted
    pub min_trend_points: usize,
    /// Entries two symptoms must share before they are correlated
    pub min_cooccurrences: usize,
    /// Weak correlations with fewer samples than this are dropped as noise
    pub noise_min_sample: usize,
    /// |r| for `high` correlation significance
    pub high_correlation: f64,
    /// |r| for `medium` correlation significance
    pub medium_correlation: f64,
    /// |r| a correlation needs to anchor a pattern
    pub pattern_min_correlation: f64,
    /// Severity considered clinically notable for predictions
    pub notable_severity: f64,
    /// Cap on the distinct symptoms considered for pairwise correlation
    pub max_correlated_symptoms: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stable_slope: 0.05,
            high_slope: 0.3,
            high_min_points: 5,
            medium_slope: 0.1,
            medium_min_points: 3,
            min_trend_points: 2,
            min_cooccurrences: 3,
            noise_min_sample: 5,
            high_correlation: 0.7,
            medium_correlation: 0.4,
            pattern_min_correlation: 0.4,
            notable_severity: 7.0,
            max_correlated_symptoms: 64,
        }
    }
}

impl AnalysisConfig {
    /// Reject thresholds that are negative, inverted or out of range
    pub fn validate(&self) -> AnalysisResult<()> {
        let fail = |msg: String| Err(AnalysisError::Configuration(msg));

        if !(self.stable_slope >= 0.0) {
            return fail(format!("stable_slope must be >= 0, got {}", self.stable_slope));
        }
        if !(self.medium_slope >= 0.0 && self.medium_slope <= self.high_slope) {
            return fail(format!(
                "medium_slope ({}) must be between 0 and high_slope ({})",
                self.medium_slope, self.high_slope
            ));
        }
        if self.medium_min_points > self.high_min_points {
            return fail(format!(
                "medium_min_points ({}) must not exceed high_min_points ({})",
                self.medium_min_points, self.high_min_points
            ));
        }
        if self.min_trend_points < 2 {
            return fail(format!(
                "min_trend_points must be at least 2, got {}",
                self.min_trend_points
            ));
        }
        if self.min_cooccurrences < 2 {
            return fail(format!(
                "min_cooccurrences must be at least 2, got {}",
                self.min_cooccurrences
            ));
        }
        if !(self.medium_correlation > 0.0
            && self.medium_correlation <= self.high_correlation
            && self.high_correlation <= 1.0)
        {
            return fail(format!(
                "correlation thresholds must satisfy 0 < medium ({}) <= high ({}) <= 1",
                self.medium_correlation, self.high_correlation
            ));
        }
        if !(0.0..=1.0).contains(&self.pattern_min_correlation) {
            return fail(format!(
                "pattern_min_correlation must be within [0, 1], got {}",
                self.pattern_min_correlation
            ));
        }
        if !(MIN_SEVERITY as f64..=MAX_SEVERITY as f64).contains(&self.notable_severity) {
            return fail(format!(
                "notable_severity must be within [{}, {}], got {}",
                MIN_SEVERITY, MAX_SEVERITY, self.notable_severity
            ));
        }
        if self.max_correlated_symptoms < 2 {
            return fail(format!(
                "max_correlated_symptoms must be at least 2, got {}",
                self.max_correlated_symptoms
            ));
        }

        Ok(())
    }
}

/// Check an analysis window length
pub fn check_timeframe(timeframe_days: i64) -> AnalysisResult<()> {
    if timeframe_days <= 0 {
        return Err(AnalysisError::Configuration(format!(
            "timeframeDays must be positive, got {}",
            timeframe_days
        )));
    }
    if timeframe_days > MAX_TIMEFRAME_DAYS {
        return Err(AnalysisError::Configuration(format!(
            "timeframeDays must not exceed {}, got {}",
            MAX_TIMEFRAME_DAYS, timeframe_days
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = AnalysisConfig {
            medium_slope: 0.5,
            high_slope: 0.3,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::Configuration(_))
        ));

        let config = AnalysisConfig {
            medium_correlation: 0.8,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalysisConfig {
            min_cooccurrences: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let config = AnalysisConfig {
            stable_slope: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_check_timeframe() {
        assert!(check_timeframe(1).is_ok());
        assert!(check_timeframe(30).is_ok());
        assert!(check_timeframe(0).is_err());
        assert!(check_timeframe(-7).is_err());
        assert!(check_timeframe(MAX_TIMEFRAME_DAYS + 1).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AnalysisConfig = toml::from_str("min_cooccurrences = 4").unwrap();
        assert_eq!(config.min_cooccurrences, 4);
        assert_eq!(config.stable_slope, 0.05);
    }
}
