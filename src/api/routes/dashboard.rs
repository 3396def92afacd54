//! Dashboard Route
//!
//! - GET /api/v1/dashboard?days=N - Recent entries, analysis, score and
//!   insights over the stored journal

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::DaysQuery;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::scoring::Dashboard;

/// GET /api/v1/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DaysQuery>,
) -> ApiResult<Json<Dashboard>> {
    let days = query.days.unwrap_or(state.config.default_timeframe_days);
    let entries = state.store.snapshot().await;

    let dashboard = state.scorer.dashboard(&entries, days, Utc::now())?;
    Ok(Json(dashboard))
}
