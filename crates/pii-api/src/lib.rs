//! PII API - HTTP server
//!
//! Exposes the PII detection pipeline over `POST /analyze-pii`, along with
//! health probes, JSON metrics and OpenAPI documentation.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::analyze::analyze_pii_handler,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        handlers::analyze::AnalyzeRequest,
        handlers::analyze::AnalyzeResponse,
        handlers::analyze::PiiFindingBody,
        handlers::health::HealthResponse,
        handlers::health::ReadinessResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "pii", description = "PII detection and classification"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;
    let body_limit = DefaultBodyLimit::max(server.max_body_size);
    let cors = cors_layer(&server.cors_origins);

    Router::new()
        .merge(routes::api_routes())
        .merge(routes::health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::metrics_middleware,
        ))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Names used to train the model behind `create_router_for_testing`
#[cfg(feature = "test-utils")]
pub const TESTING_NAMES: &[&str] = &["John", "Priya", "Rahul", "Amit", "Sunita"];

/// Router with an initialized analyzer trained on `TESTING_NAMES`
#[cfg(feature = "test-utils")]
pub fn create_router_for_testing() -> Router {
    use pii_core::config::AppConfig;
    use pii_extractor::{NameModel, PiiAnalyzer};

    let model = match NameModel::train(TESTING_NAMES) {
        Ok(model) => model,
        Err(e) => panic!("testing corpus must train: {e}"),
    };
    let state = AppState::with_detector(AppConfig::default(), Arc::new(PiiAnalyzer::new(model)));
    create_router(Arc::new(state))
}

/// Router whose analyzer has not been initialized
#[cfg(feature = "test-utils")]
pub fn create_uninitialized_router_for_testing() -> Router {
    create_router(Arc::new(AppState::default()))
}
