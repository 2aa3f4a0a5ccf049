//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and
//! compression savings.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
///
/// Counters never reset on their own; `reset` exists for test isolation and the
/// admin surface. `size_bytes`/`entries` mirror the live table and are reset
/// by `clear`, not by `reset`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (absent, expired, mismatched)
    pub misses: u64,
    /// Number of live entries removed under capacity pressure
    pub evictions: u64,
    /// Number of entries removed because their TTL elapsed
    pub expirations: u64,
    /// Number of entries removed by content mismatch or invalidation scans
    pub invalidations: u64,
    /// Bytes currently stored
    pub size_bytes: usize,
    /// Current number of entries in the cache
    pub entries: usize,
    /// Bytes saved by compression over the cache lifetime
    pub compression_savings_bytes: u64,
    /// hits / (hits + misses), 0 with no traffic
    pub hit_rate: f64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn compute_hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn record_invalidation(&mut self) {
        self.invalidations += 1;
    }

    pub fn record_compression_savings(&mut self, saved: usize) {
        self.compression_savings_bytes += saved as u64;
    }

    // == Occupancy ==
    /// Mirrors the table's current byte size and entry count.
    pub fn set_occupancy(&mut self, size_bytes: usize, entries: usize) {
        self.size_bytes = size_bytes;
        self.entries = entries;
    }

    // == Reset ==
    /// Zeroes the traffic counters, keeping occupancy.
    pub fn reset(&mut self) {
        *self = Self {
            size_bytes: self.size_bytes,
            entries: self.entries,
            ..Self::default()
        };
    }

    // == Snapshot ==
    /// Read-only copy with the derived hit rate filled in.
    pub fn snapshot(&self) -> CacheStats {
        let mut snapshot = self.clone();
        snapshot.hit_rate = self.compute_hit_rate();
        snapshot
    }
}
