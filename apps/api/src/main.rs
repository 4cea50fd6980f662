use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use talentgate::config::Config;
use talentgate::embedding::{EmbeddingProvider, HashingEmbedder, HttpEmbeddingProvider};
use talentgate::rl::policy::PolicyService;
use talentgate::rl::qtable::QTable;
use talentgate::rl::trainer::{self, TrainerConfig};
use talentgate::routes::build_router;
use talentgate::sentiment::{LexiconSentiment, SentimentScorer};
use talentgate::state::AppState;
use talentgate::store::CsvStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("talentgate={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting talentgate API v{}", env!("CARGO_PKG_VERSION"));

    // CSV-backed record storage
    let store = CsvStore::new(config.data_dir.clone());

    // Embedding provider: external service when configured, local otherwise
    let embedder: Arc<dyn EmbeddingProvider> = match &config.embedding_endpoint {
        Some(endpoint) => {
            info!("Embedding provider: HTTP ({endpoint})");
            Arc::new(HttpEmbeddingProvider::new(
                endpoint.clone(),
                config.embedding_timeout_secs,
            ))
        }
        None => {
            info!("Embedding provider: local hashing embedder");
            Arc::new(HashingEmbedder)
        }
    };

    let sentiment: Arc<dyn SentimentScorer> = Arc::new(LexiconSentiment);

    // Decision policy: load the persisted table, or train a fresh one when
    // the snapshot is absent or unreadable.
    let policy = Arc::new(PolicyService::new(bootstrap_q_table(&config)));

    let state = AppState {
        store,
        embedder,
        sentiment,
        policy,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the canonical Q-table snapshot. When it is missing or corrupt the
/// service trains a bootstrap table and persists it, so the first decision
/// request never pays the training cost.
fn bootstrap_q_table(config: &Config) -> Option<QTable> {
    if let Some(table) = QTable::load_or_none(&config.q_table_path) {
        info!(
            "Loaded Q-table snapshot ({} states) from {}",
            table.len(),
            config.q_table_path.display()
        );
        return Some(table);
    }

    info!("No usable Q-table snapshot; training a bootstrap policy");
    let table = trainer::train(&TrainerConfig::bootstrap());
    if let Err(e) = table.save(&config.q_table_path) {
        tracing::warn!("Failed to persist bootstrap Q-table: {e:#}");
    }
    Some(table)
}
