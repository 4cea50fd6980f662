pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers::handle_top_candidates;
use crate::scoring::handlers::{handle_decide, handle_evaluate};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/evaluate", post(handle_evaluate))
        .route("/decide", post(handle_decide))
        .route("/top_candidates", get(handle_top_candidates))
        .with_state(state)
}
