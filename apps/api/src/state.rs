use std::sync::Arc;

use crate::config::Config;
use crate::embedding::EmbeddingProvider;
use crate::rl::policy::PolicyService;
use crate::sentiment::SentimentScorer;
use crate::store::CsvStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: CsvStore,
    /// Pluggable embedding provider: HTTP-backed when an endpoint is
    /// configured, the deterministic local embedder otherwise.
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub sentiment: Arc<dyn SentimentScorer>,
    /// Decision policy holding the swappable Q-table snapshot.
    pub policy: Arc<PolicyService>,
    pub config: Config,
}
