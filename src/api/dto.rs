//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::journal::{EntryInput, HealthEntry};

// ============================================
// ANALYSIS DTOs
// ============================================

/// Body of the analyze, score and insights endpoints
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Entries to analyze; the stored journal when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<EntryInput>>,
    /// Window length, defaults to the configured timeframe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe_days: Option<i64>,
    /// End of the window (RFC 3339 or YYYY-MM-DD), defaults to now
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_time: Option<String>,
}

/// `?days=` query parameter
#[derive(Debug, Default, Deserialize)]
pub struct DaysQuery {
    pub days: Option<i64>,
}

// ============================================
// ENTRY DTOs
// ============================================

/// Batch entry request
#[derive(Debug, Deserialize, Serialize)]
pub struct BatchEntriesRequest {
    pub entries: Vec<EntryInput>,
}

/// Batch entry response
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchEntriesResponse {
    /// Status: "ok"
    pub status: String,
    /// Number of entries stored
    pub accepted: usize,
}

/// Entry list response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryListResponse {
    pub entries: Vec<HealthEntry>,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe_days: Option<i64>,
}

/// Entry deletion response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEntryResponse {
    pub status: String,
    pub id: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall status: "healthy"
    pub status: String,
    /// Number of stored entries
    pub entries: usize,
    /// Whether entries are written to disk
    pub persistent: bool,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// API version
    pub version: String,
}
