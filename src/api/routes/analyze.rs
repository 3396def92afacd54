//! Analysis Routes
//!
//! - POST /api/v1/analyze - Pattern analysis
//! - POST /api/v1/score - Health score
//! - POST /api/v1/insights - Rule-based insights
//!
//! All three take the same body. Without `entries` they run over the
//! stored journal.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::analysis::{check_timeframe, PatternAnalysis};
use crate::api::dto::AnalyzeRequest;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::journal::{parse_date, validate_inputs, HealthEntry};
use crate::scoring::{HealthScore, Insight};

/// Entries and window resolved from a request
pub(crate) struct AnalysisInput {
    pub entries: Vec<HealthEntry>,
    pub timeframe_days: i64,
    pub reference_time: DateTime<Utc>,
}

/// Resolve the window first, then the entries
pub(crate) async fn resolve(state: &AppState, req: AnalyzeRequest) -> ApiResult<AnalysisInput> {
    let now = Utc::now();

    let timeframe_days = req
        .timeframe_days
        .unwrap_or(state.config.default_timeframe_days);
    check_timeframe(timeframe_days)?;

    let reference_time = match req.reference_time.as_deref() {
        Some(raw) => parse_date(raw).ok_or_else(|| {
            ApiError::Configuration(format!("referenceTime '{}' is not a valid timestamp", raw))
        })?,
        None => now,
    };

    let entries = match req.entries {
        Some(inputs) => {
            check_batch_size(state, inputs.len())?;
            validate_inputs(inputs, now)?
        }
        None => state.store.snapshot().await,
    };

    Ok(AnalysisInput {
        entries,
        timeframe_days,
        reference_time,
    })
}

/// Reject requests above the configured entry limit
pub(crate) fn check_batch_size(state: &AppState, count: usize) -> ApiResult<()> {
    let limit = state.config.max_entries_per_request;
    if count > limit {
        return Err(ApiError::Configuration(format!(
            "request carries {} entries, the limit is {}",
            count, limit
        )));
    }
    Ok(())
}

/// POST /api/v1/analyze
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<PatternAnalysis>> {
    let Json(req) = payload?;
    let input = resolve(&state, req).await?;

    let analysis = state
        .engine()
        .analyze(&input.entries, input.timeframe_days, input.reference_time)?;

    tracing::info!(
        entries = analysis.entry_count,
        trends = analysis.trends.len(),
        correlations = analysis.correlations.len(),
        "Analysis served"
    );

    Ok(Json(analysis))
}

/// POST /api/v1/score
pub async fn score(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<HealthScore>> {
    let Json(req) = payload?;
    let input = resolve(&state, req).await?;
    let score = state
        .scorer
        .score(&input.entries, input.timeframe_days, input.reference_time)?;
    Ok(Json(score))
}

/// POST /api/v1/insights
pub async fn insights(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<Insight>>> {
    let Json(req) = payload?;
    let input = resolve(&state, req).await?;
    let insights = state
        .scorer
        .insights(&input.entries, input.timeframe_days, input.reference_time)?;
    Ok(Json(insights))
}
