//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::analysis::PatternEngine;
use crate::config::ApiConfig;
use crate::journal::EntryStore;
use crate::scoring::HealthScorer;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Stored journal entries
    pub store: Arc<EntryStore>,
    /// Scorer, which also owns the pattern engine
    pub scorer: Arc<HealthScorer>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState
    pub fn new(store: Arc<EntryStore>, scorer: HealthScorer, config: ApiConfig) -> Self {
        Self {
            store,
            scorer: Arc::new(scorer),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// The pattern engine behind the scorer
    pub fn engine(&self) -> &PatternEngine {
        self.scorer.engine()
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
