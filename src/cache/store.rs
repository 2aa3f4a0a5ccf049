//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, TTL
//! expiration, byte/entry budgets and content validation.
//!
//! The store itself is single-threaded (`&mut self`); [`super::AiCache`] wraps
//! it in a lock for shared use. Every public operation degrades instead of
//! failing: invalid keys are no-ops, encoding failures skip the write, and
//! undecodable payloads read as misses.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::compression::{CompressionHook, Payload};
use crate::cache::entry::duration_ms;
use crate::cache::{fingerprint, CacheEntry, CacheStats, EntryInfo, LruTracker};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Large-payload compression policy
    compression: CompressionHook,
    /// Sum of `size_bytes` over stored entries
    current_size: usize,
    /// Byte budget
    max_size_bytes: usize,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Default TTL in milliseconds for entries without explicit TTL
    default_ttl_ms: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore from the cache parameters.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            compression: CompressionHook::new(
                config.compression_enabled,
                config.compression_threshold_bytes,
            ),
            current_size: 0,
            max_size_bytes: config.max_size_bytes,
            max_entries: config.max_entries.max(1),
            default_ttl_ms: config.ttl_ms,
        }
    }

    // == Set ==
    /// Stores a value, overwriting any entry at `key`.
    ///
    /// Returns false when nothing was stored (invalid key or serialization
    /// failure); the previous entry, if any, is left untouched in that case.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T, ttl: Option<Duration>) -> bool {
        self.store(key, value, ttl, None)
    }

    // == Set With Fingerprint ==
    /// Stores a value together with the fingerprint of the content it was
    /// derived from, enabling [`CacheStore::get_validated`].
    pub fn set_with_fingerprint<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        content: &[u8],
        ttl: Option<Duration>,
    ) -> bool {
        self.store(key, value, ttl, Some(fingerprint::fingerprint(content)))
    }

    fn store<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
        content_fingerprint: Option<String>,
    ) -> bool {
        match self.try_store(key, value, ttl, content_fingerprint) {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache set skipped for key '{}': {}", key, e);
                false
            }
        }
    }

    fn try_store<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
        content_fingerprint: Option<String>,
    ) -> Result<()> {
        validate_key(key)?;

        // Encode before touching the table so a failure never half-inserts
        let raw = serde_json::to_vec(value)?;
        let (payload, saved) = self.compression.apply(raw);
        let incoming = payload.stored_len();

        // Overwrite: the old entry's bytes must not count against the new one
        self.remove_entry(key);
        self.ensure_capacity(incoming);

        if incoming > self.max_size_bytes {
            warn!(
                "Entry '{}' ({} bytes) exceeds the cache byte budget of {} bytes",
                key, incoming, self.max_size_bytes
            );
        }

        let ttl_ms = ttl.map_or(self.default_ttl_ms, duration_ms);
        let entry = CacheEntry::new(payload, ttl_ms, content_fingerprint);

        self.stats.record_compression_savings(saved);
        self.current_size += entry.size_bytes;
        self.entries.insert(key.to_string(), entry);
        self.lru.touch(key);
        self.sync_occupancy();

        debug!("Cached '{}' ({} bytes, ttl {}ms)", key, incoming, ttl_ms);
        Ok(())
    }

    // == Ensure Capacity ==
    /// Evicts least recently used entries until `incoming` more bytes and one
    /// more entry fit both budgets.
    ///
    /// An entry larger than the whole byte budget empties the table and is then
    /// admitted anyway. Returns the number of evicted entries.
    pub fn ensure_capacity(&mut self, incoming: usize) -> usize {
        let mut evicted = 0;

        while !self.entries.is_empty()
            && (self.current_size + incoming > self.max_size_bytes
                || self.entries.len() >= self.max_entries)
        {
            let Some(key) = self.lru.evict_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&key) {
                self.current_size -= entry.size_bytes;
                self.stats.record_eviction();
                evicted += 1;
                debug!("Evicted '{}' ({} bytes)", key, entry.size_bytes);
            }
        }

        if evicted > 0 {
            self.sync_occupancy();
        }
        evicted
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns None if the key is absent or expired; expired entries are
    /// removed as a side effect.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        self.lookup(key, None)
    }

    // == Get Validated ==
    /// Like [`CacheStore::get`], but an entry whose stored fingerprint differs
    /// from the fingerprint of `content` is deleted and reported as a miss.
    pub fn get_validated<T: DeserializeOwned>(&mut self, key: &str, content: &[u8]) -> Option<T> {
        self.lookup(key, Some(content))
    }

    fn lookup<T: DeserializeOwned>(&mut self, key: &str, content: Option<&[u8]>) -> Option<T> {
        if let Err(e) = validate_key(key) {
            warn!("Cache get ignored: {}", e);
            return None;
        }

        let now = Instant::now();
        let (expired, mismatched) = match self.entries.get(key) {
            Some(entry) => (
                entry.is_expired_at(now),
                content
                    .zip(entry.content_fingerprint.as_deref())
                    .is_some_and(|(content, expected)| !fingerprint::matches(content, expected)),
            ),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            debug!("Cache entry '{}' expired", key);
            return None;
        }

        if mismatched {
            warn!("Content fingerprint mismatch for '{}', dropping entry", key);
            self.remove_entry(key);
            self.stats.record_invalidation();
            self.stats.record_miss();
            return None;
        }

        let decoded = self.entries.get(key).map(|entry| decode::<T>(&entry.payload))?;
        match decoded {
            Ok(value) => {
                if let Some(entry) = self.entries.get_mut(key) {
                    entry.record_access();
                }
                self.lru.touch(key);
                self.stats.record_hit();
                Some(value)
            }
            Err(CacheError::Compression(e)) => {
                warn!("Corrupt payload for '{}', dropping entry: {}", key, e);
                self.remove_entry(key);
                self.stats.record_invalidation();
                self.stats.record_miss();
                None
            }
            Err(e) => {
                warn!("Cached value for '{}' could not be decoded: {}", key, e);
                self.stats.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Checks whether a live entry exists, without counting a hit or miss and
    /// without refreshing its recency.
    pub fn has(&mut self, key: &str) -> bool {
        if let Err(e) = validate_key(key) {
            warn!("Cache has ignored: {}", e);
            return false;
        }

        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => return false,
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expiration();
            return false;
        }
        true
    }

    // == Delete ==
    /// Removes an entry by key. Returns true if an entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        if let Err(e) = validate_key(key) {
            warn!("Cache delete ignored: {}", e);
            return false;
        }
        self.remove_entry(key).is_some()
    }

    // == Batch Operations ==
    /// Looks up several keys; one slot per key, in order.
    pub fn mget<T: DeserializeOwned, K: AsRef<str>>(&mut self, keys: &[K]) -> Vec<Option<T>> {
        keys.iter().map(|key| self.get(key.as_ref())).collect()
    }

    /// Stores several values with a shared TTL. Returns how many were stored.
    pub fn mset<T: Serialize, K: AsRef<str>>(&mut self, items: &[(K, T)], ttl: Option<Duration>) -> usize {
        items
            .iter()
            .filter(|(key, value)| self.set(key.as_ref(), value, ttl))
            .count()
    }

    /// Deletes several keys. Returns how many existed.
    pub fn mdelete<K: AsRef<str>>(&mut self, keys: &[K]) -> usize {
        keys.iter().filter(|key| self.delete(key.as_ref())).count()
    }

    // == Scan Support ==
    /// Snapshot of every stored key, live or not.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Removes `key` if its TTL has elapsed. Returns true if it was removed.
    pub fn remove_if_expired(&mut self, key: &str) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired());

        if expired {
            self.remove_entry(key);
            self.stats.record_expiration();
        }
        expired
    }

    /// Removes `key` as an invalidation if `predicate` accepts its entry.
    pub fn invalidate_if<F>(&mut self, key: &str, predicate: F) -> bool
    where
        F: FnOnce(&str, &CacheEntry) -> bool,
    {
        let matched = self
            .entries
            .get(key)
            .is_some_and(|entry| predicate(key, entry));

        if matched {
            self.remove_entry(key);
            self.stats.record_invalidation();
        }
        matched
    }

    // == Clear ==
    /// Removes every entry. Traffic counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.current_size = 0;
        self.sync_occupancy();
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    // == Entry Info ==
    /// Metadata of a live entry; does not count as an access.
    pub fn entry_info(&self, key: &str) -> Option<EntryInfo> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| EntryInfo::from_entry(key, entry))
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes currently stored.
    pub fn size_bytes(&self) -> usize {
        self.current_size
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.current_size -= entry.size_bytes;
        self.sync_occupancy();
        Some(entry)
    }

    fn sync_occupancy(&mut self) {
        self.stats.set_occupancy(self.current_size, self.entries.len());
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(payload: &Payload) -> Result<T> {
    let bytes = payload.to_json_bytes()?;
    Ok(serde_json::from_slice(&bytes)?)
}
