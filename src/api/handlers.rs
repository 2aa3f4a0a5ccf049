//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::AiCache;
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, EntryInfoResponse, HealthResponse, InvalidateRequest, InvalidateResponse,
    InvalidateTarget, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache handle
    pub cache: AiCache,
}

impl AppState {
    /// Creates a new AppState around an existing cache handle.
    pub fn new(cache: AiCache) -> Self {
        Self { cache }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(AiCache::new(config.clone()))
    }
}

/// Handler for GET /cache/:key
///
/// Returns entry metadata without counting a hit.
pub async fn entry_info_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryInfoResponse>> {
    state
        .cache
        .entry_info(&key)
        .map(|info| Json(info.into()))
        .ok_or(CacheError::NotFound(key))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if state.cache.delete(&key) {
        Ok(Json(DeleteResponse::new(key)))
    } else {
        Err(CacheError::NotFound(key))
    }
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let removed = state.cache.stats().entries;
    state.cache.clear();
    Json(InvalidateResponse { removed })
}

/// Handler for POST /cache/invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    let removed = match req.target().map_err(CacheError::InvalidRequest)? {
        InvalidateTarget::Pattern(pattern) => state.cache.invalidate_by_pattern(&pattern),
        InvalidateTarget::Fingerprint(hash) => state.cache.invalidate_by_content_fingerprint(&hash),
    };

    Ok(Json(InvalidateResponse { removed }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().into())
}

/// Handler for POST /stats/reset
pub async fn reset_stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    state.cache.reset_stats();
    Json(state.cache.stats().into())
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.is_cleanup_running()))
}
