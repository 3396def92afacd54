//! Analysis result types
//!
//! Everything the engine emits. All floats are rounded to four decimals
//! before they leave the engine, so results serialize to JSON and back
//! without loss.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a symptom's severity over time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Qualitative significance bucket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Significance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Significance::Low => write!(f, "low"),
            Significance::Medium => write!(f, "medium"),
            Significance::High => write!(f, "high"),
        }
    }
}

/// Trend of a single symptom
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    /// Normalized symptom name
    pub symptom: String,
    pub direction: TrendDirection,
    /// OLS slope in severity points per day
    pub rate: f64,
    /// Days between the first and last observation, rounded up
    pub timeframe_days: i64,
    pub significance: Significance,
    /// Number of observations the fit used
    pub data_points: usize,
    /// Mean severity over the window
    pub mean_severity: f64,
    /// Goodness of fit, clipped to [0, 1]
    pub r_squared: f64,
}

/// Sign of a correlation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationDirection {
    Positive,
    Negative,
}

/// Correlation between two symptoms that co-occur in entries
///
/// `symptom_a < symptom_b` lexicographically, so a pair is reported once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationResult {
    pub symptom_a: String,
    pub symptom_b: String,
    /// Pearson coefficient in [-1, 1]
    pub coefficient: f64,
    pub direction: CorrelationDirection,
    /// Number of entries containing both symptoms
    pub sample_size: usize,
    pub significance: Significance,
}

impl CorrelationResult {
    /// The other symptom of the pair, if `symptom` is part of it
    pub fn partner_of(&self, symptom: &str) -> Option<&str> {
        if self.symptom_a == symptom {
            Some(&self.symptom_b)
        } else if self.symptom_b == symptom {
            Some(&self.symptom_a)
        } else {
            None
        }
    }
}

/// Whether a pattern's anchor symptom is getting worse or better
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Escalating,
    Easing,
}

/// A correlated partner inside a pattern
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatternLink {
    pub symptom: String,
    pub coefficient: f64,
}

/// A trending symptom together with the symptoms that move with it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatternResult {
    pub id: String,
    pub kind: PatternKind,
    /// Anchor symptom carrying the trend
    pub symptom: String,
    /// Anchor followed by its partners
    pub symptoms: Vec<String>,
    pub direction: TrendDirection,
    pub rate: f64,
    pub links: Vec<PatternLink>,
    /// Mean |r| across links
    pub confidence: f64,
    /// Mean severity of the anchor symptom
    pub average_severity: f64,
    pub description: String,
}

/// Qualitative recurrence likelihood
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Likelihood {
    Likely,
    Possible,
    Unlikely,
}

impl std::fmt::Display for Likelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Likelihood::Likely => write!(f, "likely"),
            Likelihood::Possible => write!(f, "possible"),
            Likelihood::Unlikely => write!(f, "unlikely"),
        }
    }
}

/// Forward projection of a trending symptom
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub symptom: String,
    pub likelihood: Likelihood,
    /// Projection horizon
    pub timeframe_days: i64,
    /// R² of the underlying fit, clipped to [0, 1]
    pub confidence: f64,
    /// Fitted severity at the end of the horizon, clamped to [1, 10]
    pub projected_severity: f64,
    /// Days from the last observation until the notable threshold is reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_to_threshold: Option<f64>,
    pub factors: Vec<String>,
}

/// Complete output of one engine invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatternAnalysis {
    pub summary: String,
    pub trends: Vec<TrendResult>,
    pub correlations: Vec<CorrelationResult>,
    pub patterns: Vec<PatternResult>,
    pub predictions: Vec<PredictionResult>,
    /// Entries that fell inside the window
    pub entry_count: usize,
    pub timeframe_days: i64,
    pub reference_time: DateTime<Utc>,
}

impl PatternAnalysis {
    /// Check if the window held no entries
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}
