//! Health Score and Insights
//!
//! - **score**: Severity-based score with frequency and consistency factors
//! - **insights**: Rule-based insights
//! - **scorer**: `HealthScorer`, including the dashboard aggregate

pub mod config;
pub mod insights;
pub mod score;
pub mod scorer;
pub mod types;

pub use config::ScoringConfig;
pub use scorer::HealthScorer;
pub use types::{
    Dashboard, FactorTrend, HealthFactor, HealthScore, Insight, InsightKind, InsightSeverity,
    ScoreTrend,
};
