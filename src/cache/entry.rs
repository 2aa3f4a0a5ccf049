//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.
//!
//! Expiry runs on the monotonic clock; the wall-clock timestamps are kept for
//! inspection only.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::compression::Payload;

// == Cache Entry ==
/// Represents a single cache entry with payload and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub payload: Payload,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Time-to-live in milliseconds
    pub ttl_ms: u64,
    /// Last successful read (Unix milliseconds)
    pub last_accessed_at: u64,
    /// Number of successful reads
    pub access_count: u64,
    /// Bytes counted against the byte budget
    pub size_bytes: usize,
    /// SHA-256 of the source content, for content-keyed entries
    pub content_fingerprint: Option<String>,
    /// Monotonic insertion time the TTL is measured from
    inserted_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `payload` - The encoded value to store
    /// * `ttl_ms` - Time-to-live in milliseconds
    /// * `content_fingerprint` - Optional content hash for validated reads
    pub fn new(payload: Payload, ttl_ms: u64, content_fingerprint: Option<String>) -> Self {
        let now = current_timestamp_ms();
        let size_bytes = payload.stored_len();

        Self {
            payload,
            created_at: now,
            ttl_ms,
            last_accessed_at: now,
            access_count: 0,
            size_bytes,
            content_fingerprint,
            inserted_at: Instant::now(),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once `ttl_ms` or more has
    /// elapsed since insertion.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl()
    }

    pub fn inserted_at(&self) -> Instant {
        self.inserted_at
    }

    fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    // == Record Access ==
    /// Marks a successful read.
    pub fn record_access(&mut self) {
        self.last_accessed_at = current_timestamp_ms();
        self.access_count += 1;
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        duration_ms(self.ttl().saturating_sub(self.inserted_at.elapsed()))
    }
}

// == Entry Info ==
/// Read-only metadata of a live entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryInfo {
    pub key: String,
    pub size_bytes: usize,
    pub compressed: bool,
    pub content_fingerprint: Option<String>,
    pub access_count: u64,
    /// Unix milliseconds
    pub created_at: u64,
    /// Unix milliseconds
    pub last_accessed_at: u64,
    pub ttl_remaining_ms: u64,
}

impl EntryInfo {
    pub fn from_entry(key: &str, entry: &CacheEntry) -> Self {
        Self {
            key: key.to_string(),
            size_bytes: entry.size_bytes,
            compressed: entry.payload.is_compressed(),
            content_fingerprint: entry.content_fingerprint.clone(),
            access_count: entry.access_count,
            created_at: entry.created_at,
            last_accessed_at: entry.last_accessed_at,
            ttl_remaining_ms: entry.ttl_remaining_ms(),
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(duration_ms)
        .unwrap_or(0)
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
