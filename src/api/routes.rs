//! API Routes
//!
//! Configures the Axum router with the cache admin endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, entry_info_handler, health_handler, invalidate_handler,
    reset_stats_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /stats` - Cache statistics
/// - `POST /stats/reset` - Reset traffic counters
/// - `GET /cache/:key` - Entry metadata
/// - `DELETE /cache/:key` - Delete one entry
/// - `DELETE /cache` - Clear the cache
/// - `POST /cache/invalidate` - Invalidate by key pattern or content fingerprint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/stats/reset", post(reset_stats_handler))
        .route("/cache", axum::routing::delete(clear_handler))
        .route("/cache/invalidate", post(invalidate_handler))
        .route("/cache/:key", get(entry_info_handler).delete(delete_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
