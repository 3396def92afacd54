//! Health Journal API Server
//!
//! Run with: cargo run --bin health-journal
//!
//! Configuration is read from the first of
//! `~/.config/health-journal/config.toml`, `/etc/health-journal/config.toml`
//! and `./config.toml`, then overridden by `HEALTH_JOURNAL_*` environment
//! variables. `RUST_LOG` takes precedence over the configured log level.

use health_journal::analysis::PatternEngine;
use health_journal::api::{serve, AppState};
use health_journal::config::{Config, LoggingConfig};
use health_journal::journal::EntryStore;
use health_journal::scoring::HealthScorer;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_default();
    init_tracing(&config.logging);

    tracing::info!("Starting health journal server v{}", env!("CARGO_PKG_VERSION"));

    let engine = PatternEngine::new(config.analysis.clone())?;
    let scorer = HealthScorer::new(engine, config.scoring.clone())?;

    let store_config = config.journal.store_config();
    tracing::info!("Data directory: {:?}", store_config.data_dir);
    let store = Arc::new(EntryStore::open(store_config).await?);

    let state = AppState::new(Arc::clone(&store), scorer, config.api.clone());
    serve(state, &config.api).await?;

    tracing::info!("Flushing journal...");
    store.flush().await?;
    tracing::info!("Health journal server stopped");

    Ok(())
}

/// Install the global subscriber in the configured format
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("health_journal={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}
