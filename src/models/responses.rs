//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::cache::{CacheStats, EntryInfo};

/// Response body for GET /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfoResponse {
    pub key: String,
    pub size_bytes: usize,
    pub compressed: bool,
    /// Whether the entry carries a content fingerprint
    pub content_keyed: bool,
    pub content_fingerprint: Option<String>,
    pub access_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub ttl_remaining_ms: u64,
}

impl From<EntryInfo> for EntryInfoResponse {
    fn from(info: EntryInfo) -> Self {
        Self {
            content_keyed: info.content_fingerprint.is_some(),
            key: info.key,
            size_bytes: info.size_bytes,
            compressed: info.compressed,
            content_fingerprint: info.content_fingerprint,
            access_count: info.access_count,
            created_at: millis_to_datetime(info.created_at),
            last_accessed_at: millis_to_datetime(info.last_accessed_at),
            ttl_remaining_ms: info.ttl_remaining_ms,
        }
    }
}

fn millis_to_datetime(ms: u64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms as i64)
        .single()
        .unwrap_or_default()
}

/// Response body for DELETE /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for POST /cache/invalidate and DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Number of entries removed
    pub removed: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub invalidations: u64,
    /// Bytes currently stored
    pub size: usize,
    /// Current number of entries in cache
    pub entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub compression_savings: u64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            invalidations: stats.invalidations,
            size: stats.size_bytes,
            entries: stats.entries,
            hit_rate: stats.hit_rate,
            compression_savings: stats.compression_savings_bytes,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Whether the background sweep is alive
    pub cleanup_running: bool,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cleanup_running: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            cleanup_running,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
