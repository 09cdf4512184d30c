pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        // unversioned path kept for older front-end builds
        .route("/api/analyze", post(handlers::handle_analyze))
        .route("/api/v1/diagnostics", get(handlers::handle_diagnostics))
        .with_state(state)
}
