//! Health Journal REST API
//!
//! HTTP API layer for the journal and the pattern engine, built with Axum.
//!
//! # Endpoints
//!
//! ## Analysis
//! - `POST /api/v1/analyze` - Pattern analysis
//! - `POST /api/v1/score` - Health score
//! - `POST /api/v1/insights` - Rule-based insights
//! - `GET /api/v1/dashboard` - Dashboard over the stored journal
//!
//! ## Entries
//! - `POST /api/v1/entries` - Add an entry
//! - `POST /api/v1/entries/batch` - Add a batch of entries
//! - `GET /api/v1/entries` - List entries
//! - `GET /api/v1/entries/:id` - Get an entry
//! - `DELETE /api/v1/entries/:id` - Delete an entry
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use health_journal::api::{serve, AppState};
//! use health_journal::config::ApiConfig;
//! use health_journal::journal::{EntryStore, StoreConfig};
//! use health_journal::scoring::HealthScorer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(EntryStore::open(StoreConfig::in_memory()).await?);
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(store, HealthScorer::default(), config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Analysis routes
        .route("/analyze", post(routes::analyze::analyze))
        .route("/score", post(routes::analyze::score))
        .route("/insights", post(routes::analyze::insights))
        .route("/dashboard", get(routes::dashboard::dashboard))
        // Entry routes
        .route(
            "/entries",
            get(routes::entries::list_entries).post(routes::entries::create_entry),
        )
        .route("/entries/batch", post(routes::entries::create_batch))
        .route(
            "/entries/:id",
            get(routes::entries::get_entry).delete(routes::entries::delete_entry),
        )
        .layer(DefaultBodyLimit::max(state.config.max_body_size));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config);
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS for the configured origins; permissive when none parse
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Health journal API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Health journal API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::EntryStore;
    use crate::scoring::HealthScorer;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn create_test_app_with(config: ApiConfig) -> Router {
        let store = Arc::new(EntryStore::in_memory());
        let state = AppState::new(store, HealthScorer::default(), config);
        build_router(state)
    }

    fn create_test_app() -> Router {
        create_test_app_with(ApiConfig::default())
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn days_ago(days: i64) -> String {
        (Utc::now() - Duration::days(days)).to_rfc3339()
    }

    fn headache_entries() -> Value {
        json!([
            {"id": "d1", "date": "2024-01-01", "symptoms": [{"name": "headache", "severity": 3}]},
            {"id": "d8", "date": "2024-01-08", "symptoms": [{"name": "headache", "severity": 6}]},
            {"id": "d15", "date": "2024-01-15", "symptoms": [{"name": "Headache", "severity": 9}]}
        ])
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = create_test_app();

        let (status, _) = send(&app, "GET", "/health/live", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "GET", "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["entries"], 0);
        assert_eq!(body["persistent"], false);
    }

    #[tokio::test]
    async fn test_analyze_inline_entries() {
        let app = create_test_app();
        let body = json!({
            "entries": headache_entries(),
            "timeframeDays": 30,
            "referenceTime": "2024-01-20T12:00:00Z"
        });

        let (status, body) = send(&app, "POST", "/api/v1/analyze", Some(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["trends"][0]["symptom"], "headache");
        assert_eq!(body["trends"][0]["direction"], "increasing");
        assert_eq!(body["trends"][0]["significance"], "medium");
        assert_eq!(body["entryCount"], 3);
    }

    #[tokio::test]
    async fn test_analyze_empty_journal() {
        let app = create_test_app();
        let (status, body) = send(&app, "POST", "/api/v1/analyze", Some(json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["trends"], json!([]));
        assert!(body["summary"]
            .as_str()
            .unwrap()
            .starts_with("No data available"));
    }

    #[tokio::test]
    async fn test_analyze_rejects_invalid_severity() {
        let app = create_test_app();
        let body = json!({
            "entries": [
                {"id": "ok", "date": "2024-01-01", "symptoms": [{"name": "cough", "severity": 10}]},
                {"id": "bad", "date": "2024-01-02", "symptoms": [{"name": "cough", "severity": 11}]}
            ]
        });

        let (status, body) = send(&app, "POST", "/api/v1/analyze", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["entryId"], "bad");
        assert_eq!(body["error"]["field"], "symptoms[0].severity");
        assert!(body["requestId"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_rejects_bad_timeframe() {
        let app = create_test_app();
        let body = json!({"entries": headache_entries(), "timeframeDays": 0});

        let (status, body) = send(&app, "POST", "/api/v1/analyze", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_rejects_bad_reference_time() {
        let app = create_test_app();
        let body = json!({"referenceTime": "yesterday"});

        let (status, body) = send(&app, "POST", "/api/v1/analyze", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_entry_limit() {
        let app = create_test_app_with(ApiConfig {
            max_entries_per_request: 2,
            ..Default::default()
        });
        let body = json!({"entries": headache_entries()});

        let (status, _) = send(&app, "POST", "/api/v1/analyze", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "POST", "/api/v1/entries/batch", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_entry_lifecycle() {
        let app = create_test_app();
        let entry = json!({
            "id": "e1",
            "date": days_ago(1),
            "inputText": "woke up with a headache",
            "symptoms": [{"name": "headache", "severity": 6, "duration": "2 hours"}],
            "mood": 3,
            "tags": ["morning"]
        });

        let (status, body) = send(&app, "POST", "/api/v1/entries", Some(entry.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], "e1");
        assert!(body["createdAt"].is_string());

        let (status, body) = send(&app, "POST", "/api/v1/entries", Some(entry)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        let (status, body) = send(&app, "GET", "/api/v1/entries/e1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["symptoms"][0]["severity"], 6);

        let (status, body) = send(&app, "GET", "/api/v1/entries?days=7", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);

        let (status, _) = send(&app, "DELETE", "/api/v1/entries/e1", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", "/api/v1/entries/e1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (status, _) = send(&app, "DELETE", "/api/v1/entries/e1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_entry_generates_id() {
        let app = create_test_app();
        let entry = json!({"date": days_ago(0), "symptoms": []});

        let (status, body) = send(&app, "POST", "/api/v1/entries", Some(entry)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(uuid::Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_create_entry_rejects_missing_date() {
        let app = create_test_app();
        let entry = json!({"id": "e1", "symptoms": [{"name": "cough", "severity": 3}]});

        let (status, body) = send(&app, "POST", "/api/v1/entries", Some(entry)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "date");
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let app = create_test_app();
        send(
            &app,
            "POST",
            "/api/v1/entries",
            Some(json!({"id": "d8", "date": days_ago(3)})),
        )
        .await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/entries/batch",
            Some(json!({"entries": headache_entries()})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(body["entries"], 1);
    }

    #[tokio::test]
    async fn test_stored_journal_drives_score_and_dashboard() {
        let app = create_test_app();
        let entries: Vec<Value> = (0..4)
            .map(|i| {
                json!({
                    "id": format!("e{}", i),
                    "date": days_ago(8 - 2 * i),
                    "symptoms": [{"name": "migraine", "severity": 8}]
                })
            })
            .collect();

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/entries/batch",
            Some(json!({ "entries": entries })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["accepted"], 4);

        let (status, body) = send(&app, "POST", "/api/v1/score", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["overall"], 36.0);

        let (status, body) = send(&app, "POST", "/api/v1/insights", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        assert!(ids.contains(&"high_average_severity"));

        let (status, body) = send(&app, "GET", "/api/v1/dashboard?days=30", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recentEntries"][0]["id"], "e3");
        assert_eq!(body["patternAnalysis"]["entryCount"], 4);
        assert_eq!(body["healthScore"]["overall"], 36.0);
    }

    #[tokio::test]
    async fn test_wrongly_typed_symptoms_are_field_errors() {
        let app = create_test_app();
        let cases = [
            (json!({"name": "cough", "severity": 7.5}), "symptoms[0].severity"),
            (json!({"name": "cough", "severity": "7"}), "symptoms[0].severity"),
            (json!({"name": "cough"}), "symptoms[0].severity"),
            (json!({"name": 42, "severity": 7}), "symptoms[0].name"),
        ];

        for (symptom, field) in cases {
            let entry = json!({"id": "typed", "date": "2024-01-01", "symptoms": [symptom]});

            let (status, body) = send(
                &app,
                "POST",
                "/api/v1/analyze",
                Some(json!({"entries": [entry.clone()]})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", entry);
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
            assert_eq!(body["error"]["entryId"], "typed");
            assert_eq!(body["error"]["field"], field);

            let (status, body) = send(&app, "POST", "/api/v1/entries", Some(entry.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["field"], field);

            let (status, body) = send(
                &app,
                "POST",
                "/api/v1/entries/batch",
                Some(json!({"entries": [entry]})),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["entryId"], "typed");
        }

        let (_, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(body["entries"], 0);
    }

    #[tokio::test]
    async fn test_malformed_body_gets_json_error() {
        let app = create_test_app();
        let entry = json!({"id": "n", "date": 20240101, "symptoms": []});

        let (status, body) = send(&app, "POST", "/api/v1/entries", Some(entry)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["entryId"].is_null());
        assert!(body["requestId"].is_string());
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let app = create_test_app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header("Content-Type", "application/json")
            .body(Body::from("not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
