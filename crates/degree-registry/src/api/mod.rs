//! HTTP API for the degree registry.

mod docs;
mod handlers;
mod middleware;
mod types;

pub use docs::{docs_router, ApiDoc, DOCS_PATH, OPENAPI_PATH};
pub use handlers::*;
pub use middleware::{logging_middleware, rate_limit_middleware, RateLimitState};
pub use types::*;

use crate::registry::RegistryService;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Degree registry
    pub registry: RegistryService,
}

impl AppState {
    /// Create new application state.
    pub fn new(registry: RegistryService) -> Self {
        Self { registry }
    }
}

/// Create the API router with default rate limiting.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::new(120))
}

/// Create the API router with custom rate limiting.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    let limited = Router::new()
        .route("/home", get(handlers::home))
        .route("/issue-degree", post(handlers::issue_degree))
        .route("/verify-degree", post(handlers::verify_degree))
        .route("/degrees", get(handlers::list_degrees))
        .layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ));

    Router::new()
        // Health check and docs (no rate limiting)
        .route("/health", get(handlers::health))
        .merge(docs_router())
        .merge(limited)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
