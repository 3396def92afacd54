//! Entry Routes
//!
//! - POST /api/v1/entries - Add one entry
//! - POST /api/v1/entries/batch - Add entries, all or nothing
//! - GET /api/v1/entries?days=N - List entries, newest first
//! - GET /api/v1/entries/:id - Get an entry
//! - DELETE /api/v1/entries/:id - Delete an entry

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::analysis::check_timeframe;
use crate::api::dto::{
    BatchEntriesRequest, BatchEntriesResponse, DaysQuery, DeleteEntryResponse, EntryListResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::analyze::check_batch_size;
use crate::api::state::AppState;
use crate::journal::{validate_inputs, EntryInput, HealthEntry, TimeWindow};

/// POST /api/v1/entries
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EntryInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<HealthEntry>)> {
    let Json(input) = payload?;
    let entry = input.into_entry(Utc::now())?;
    state.store.add(entry.clone()).await?;

    tracing::info!(entry_id = %entry.id, symptoms = entry.symptoms.len(), "Entry created");

    Ok((StatusCode::CREATED, Json(entry)))
}

/// POST /api/v1/entries/batch
pub async fn create_batch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchEntriesRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BatchEntriesResponse>)> {
    let Json(req) = payload?;
    check_batch_size(&state, req.entries.len())?;

    let entries = validate_inputs(req.entries, Utc::now())?;
    let accepted = state.store.add_batch(entries).await?;

    tracing::info!(accepted, "Entry batch created");

    Ok((
        StatusCode::CREATED,
        Json(BatchEntriesResponse {
            status: "ok".to_string(),
            accepted,
        }),
    ))
}

/// GET /api/v1/entries
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DaysQuery>,
) -> ApiResult<Json<EntryListResponse>> {
    let entries = match query.days {
        Some(days) => {
            check_timeframe(days)?;
            state.store.list(TimeWindow::last_days(days)).await
        }
        None => state.store.recent(usize::MAX).await,
    };

    Ok(Json(EntryListResponse {
        count: entries.len(),
        entries,
        timeframe_days: query.days,
    }))
}

/// GET /api/v1/entries/:id
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<HealthEntry>> {
    state
        .store
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("entry '{}'", id)))
}

/// DELETE /api/v1/entries/:id
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteEntryResponse>> {
    let removed = state.store.delete(&id).await?;

    tracing::info!(entry_id = %removed.id, "Entry deleted");

    Ok(Json(DeleteEntryResponse {
        status: "deleted".to_string(),
        id: removed.id,
    }))
}
