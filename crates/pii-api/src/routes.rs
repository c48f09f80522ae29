//! API route definitions

use crate::handlers::{analyze, health};
use crate::middleware::security_headers_middleware;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// PII analysis routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analyze-pii", post(analyze::analyze_pii_handler))
        .layer(middleware::from_fn(security_headers_middleware))
}

/// Liveness, readiness and metrics
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics))
}
