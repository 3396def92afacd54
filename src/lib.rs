//! # Health Journal
//!
//! Local symptom journal with deterministic pattern analysis. Entries
//! record dated symptom observations; the analysis side turns them into
//! trends, correlations, patterns, predictions and a health score.
//!
//! ## Features
//!
//! - **Deterministic analysis**: Same entries and reference time give byte-identical results
//! - **Trends**: Least-squares severity slopes per symptom
//! - **Correlations**: Pearson coefficients over entry co-occurrence
//! - **Health score**: Severity-based score with supporting factors
//! - **Persistence**: Journal kept in memory with JSON snapshots
//!
//! ## Modules
//!
//! - [`journal`]: Entries, validation, storage and CSV import
//! - [`analysis`]: Trend, correlation and prediction engine
//! - [`scoring`]: Health score, insights and dashboard
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::{Duration, Utc};
//! use health_journal::journal::{EntryStore, HealthEntry, StoreConfig};
//! use health_journal::scoring::HealthScorer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = EntryStore::open(StoreConfig::persistent("./journal")).await?;
//!
//!     let now = Utc::now();
//!     store
//!         .add(HealthEntry::new("monday", now - Duration::days(2)).symptom("headache", 4))
//!         .await?;
//!     store
//!         .add(HealthEntry::new("wednesday", now).symptom("headache", 7).mood(2))
//!         .await?;
//!
//!     let scorer = HealthScorer::default();
//!     let dashboard = scorer.dashboard(&store.snapshot().await, 30, now)?;
//!
//!     println!("{}", dashboard.pattern_analysis.summary);
//!     println!("Health score: {}", dashboard.health_score.overall);
//!
//!     store.flush().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod journal;
pub mod scoring;

// Re-export top-level types for convenience
pub use journal::{
    EntryInput, EntryStore, HealthEntry, JournalError, JournalResult, StoreConfig,
    SymptomInput, SymptomObservation, TimeWindow, ValidationError,
};

pub use analysis::{
    analyze, AnalysisConfig, AnalysisError, AnalysisResult, CorrelationResult, PatternAnalysis,
    PatternEngine, PatternResult, PredictionResult, TrendResult,
};

pub use scoring::{Dashboard, HealthScore, HealthScorer, Insight, ScoringConfig};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, JournalConfig, LoggingConfig};
