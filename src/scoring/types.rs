//! Score, insight and dashboard types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::PatternAnalysis;
use crate::journal::HealthEntry;

/// Direction of the overall score between the two halves of a window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTrend {
    Improving,
    Stable,
    Declining,
}

/// Direction of a single factor between the two halves of a window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FactorTrend {
    Up,
    Down,
    Stable,
}

/// One weighted contributor to the health score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthFactor {
    pub name: String,
    /// 0 to 100
    pub score: f64,
    pub weight: f64,
    pub trend: FactorTrend,
}

/// Aggregate health score for a window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    /// Severity-based score in [10, 100]; 50 for an empty window
    pub overall: f64,
    pub trend: ScoreTrend,
    pub factors: Vec<HealthFactor>,
    pub last_updated: DateTime<Utc>,
}

/// Which part of the analysis an insight comes from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Pattern,
    Trend,
    Correlation,
    Prediction,
}

/// How urgently an insight should be surfaced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Info,
    Warning,
    Critical,
}

/// Rule-based observation about the journal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub severity: InsightSeverity,
    pub actionable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Everything the dashboard shows for one window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Newest entries of the window, newest first
    pub recent_entries: Vec<HealthEntry>,
    pub pattern_analysis: PatternAnalysis,
    pub health_score: HealthScore,
    pub insights: Vec<Insight>,
}
