//! Route table for the soda review API.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::core::services::Services;
use crate::http::{handlers, middleware as http_middleware};

/// Build the API router around shared services
pub fn build_router(services: Arc<Services>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/validate/up/:source", get(handlers::health_handler))
        // API v0 endpoints
        .route("/api/v0/post/review", put(handlers::submit_review_handler))
        .route(
            "/api/v0/retrieve/:search_type/:search_string",
            get(handlers::retrieve_handler),
        )
        // Add middleware
        .layer(middleware::from_fn(http_middleware::log_request))
        .layer(CorsLayer::permissive())
        // Add shared state
        .with_state(services)
}
