//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{calculate, health, profile, prometheus_metrics, AppState};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Calculator endpoints
        .route("/api/v1/profile", get(profile))
        .route("/api/v1/calculate", post(calculate))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
