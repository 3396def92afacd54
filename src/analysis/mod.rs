//! Pattern Analysis
//!
//! Deterministic trend, correlation and prediction engine over health
//! journal entries:
//!
//! - **series**: Windowing and per-symptom series
//! - **stats**: Least squares, Pearson correlation, helpers
//! - **trends**: Slope direction and significance per symptom
//! - **correlations**: Pairwise co-occurrence correlation
//! - **patterns**: Trends clustered with their correlated symptoms
//! - **predictions**: Linear projection against the notable severity
//! - **engine**: `PatternEngine`, tying it all together
//!
//! # Example
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use health_journal::analysis::{analyze, TrendDirection};
//! use health_journal::journal::HealthEntry;
//!
//! let now = Utc::now();
//! let entries: Vec<HealthEntry> = (0..5)
//!     .map(|i| {
//!         HealthEntry::new(format!("e{}", i), now - Duration::days(10 - 2 * i))
//!             .symptom("headache", 2 + i as u8)
//!     })
//!     .collect();
//!
//! let analysis = analyze(&entries, 30, now).unwrap();
//! assert_eq!(analysis.trends[0].direction, TrendDirection::Increasing);
//! ```

pub mod config;
pub mod correlations;
pub mod engine;
pub mod error;
pub mod patterns;
pub mod predictions;
pub mod series;
pub mod stats;
pub mod summary;
pub mod trends;
pub mod types;

pub use config::{check_timeframe, AnalysisConfig, MAX_TIMEFRAME_DAYS};
pub use engine::{analyze, PatternEngine};
pub use error::{AnalysisError, AnalysisResult};
pub use stats::{linear_regression, pearson_correlation, LinearFit};
pub use types::{
    CorrelationDirection, CorrelationResult, Likelihood, PatternAnalysis, PatternKind,
    PatternLink, PatternResult, PredictionResult, Significance, TrendDirection, TrendResult,
};
