//! Shared Cache Handle
//!
//! [`AiCache`] is the handle request handlers hold: a cheaply clonable wrapper
//! around one locked [`CacheStore`] plus the background sweep that belongs to
//! it. Construct one at startup and pass clones to whoever needs the cache.
//!
//! No operation holds the lock across an `.await`, and the O(n) scans copy
//! the key set first, then lock once per key.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{fingerprint, CacheStats, CacheStore, EntryInfo, KeyGenerator};
use crate::config::CacheConfig;
use crate::tasks::{spawn_cleanup_task, sweep_expired};

// == AI Cache ==
/// Process-wide AI-result cache handle.
#[derive(Debug, Clone)]
pub struct AiCache {
    store: Arc<Mutex<CacheStore>>,
    cleanup: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl AiCache {
    // == Constructor ==
    /// Creates a cache and starts its background sweep.
    ///
    /// The sweep needs a tokio runtime; outside one (or with a zero cleanup
    /// interval) the cache relies on lazy expiry alone.
    pub fn new(config: CacheConfig) -> Self {
        let store = Arc::new(Mutex::new(CacheStore::new(&config)));

        let cleanup = match config.cleanup_interval() {
            Some(interval) if tokio::runtime::Handle::try_current().is_ok() => {
                Some(spawn_cleanup_task(Arc::downgrade(&store), interval))
            }
            Some(_) => {
                warn!("No tokio runtime available, background cache sweep disabled");
                None
            }
            None => None,
        };

        info!(
            "AI result cache ready: max_entries={}, max_size_bytes={}, ttl={}ms, compression={}",
            config.max_entries, config.max_size_bytes, config.ttl_ms, config.compression_enabled
        );

        Self {
            store,
            cleanup: Arc::new(Mutex::new(cleanup)),
        }
    }

    // == Reads ==
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.store.lock().get(key)
    }

    /// Read for content-keyed entries: a stored fingerprint that does not match
    /// `content` drops the entry and yields a miss.
    pub fn get_validated<T: DeserializeOwned>(&self, key: &str, content: &[u8]) -> Option<T> {
        self.store.lock().get_validated(key, content)
    }

    pub fn has(&self, key: &str) -> bool {
        self.store.lock().has(key)
    }

    pub fn mget<T: DeserializeOwned, K: AsRef<str>>(&self, keys: &[K]) -> Vec<Option<T>> {
        keys.iter().map(|key| self.get(key.as_ref())).collect()
    }

    // == Writes ==
    /// Stores `value`; `ttl` overrides the configured default.
    /// Returns false when the write was skipped.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) -> bool {
        self.store.lock().set(key, value, ttl)
    }

    pub fn set_with_fingerprint<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        content: &[u8],
        ttl: Option<Duration>,
    ) -> bool {
        self.store.lock().set_with_fingerprint(key, value, content, ttl)
    }

    pub fn mset<T: Serialize, K: AsRef<str>>(&self, items: &[(K, T)], ttl: Option<Duration>) -> usize {
        items
            .iter()
            .filter(|(key, value)| self.set(key.as_ref(), value, ttl))
            .count()
    }

    pub fn delete(&self, key: &str) -> bool {
        self.store.lock().delete(key)
    }

    pub fn mdelete<K: AsRef<str>>(&self, keys: &[K]) -> usize {
        keys.iter().filter(|key| self.delete(key.as_ref())).count()
    }

    pub fn clear(&self) {
        self.store.lock().clear();
        info!("AI result cache cleared");
    }

    // == Memoization ==
    /// Serves `key` from the cache, or awaits `compute` and caches its result.
    ///
    /// Errors from `compute` are returned untouched and nothing is cached.
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let value = compute().await?;
        self.set(key, &value, ttl);
        Ok(value)
    }

    /// [`AiCache::get_or_compute`] for content-keyed entries: the hit is
    /// validated against `content` and a fresh result is stored with its
    /// fingerprint.
    pub async fn get_or_compute_for_content<T, E, F, Fut>(
        &self,
        key: &str,
        content: &[u8],
        ttl: Option<Duration>,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get_validated(key, content) {
            return Ok(hit);
        }
        let value = compute().await?;
        self.set_with_fingerprint(key, &value, content, ttl);
        Ok(value)
    }

    // == Keys ==
    pub fn key_for(&self, namespace: &str, params: &Value) -> String {
        KeyGenerator::key_for(namespace, params)
    }

    pub fn key_for_content(
        &self,
        namespace: &str,
        content: &[u8],
        user_id: &str,
        extra: Option<&Value>,
    ) -> String {
        KeyGenerator::key_for_content(namespace, content, user_id, extra)
    }

    /// Fingerprint as stored on content-keyed entries.
    pub fn fingerprint(&self, content: &[u8]) -> String {
        fingerprint::fingerprint(content)
    }

    // == Invalidation ==
    /// Removes every entry whose key contains `pattern`. Returns the count.
    pub fn invalidate_by_pattern(&self, pattern: &str) -> usize {
        if pattern.is_empty() {
            warn!("Refusing to invalidate with an empty pattern");
            return 0;
        }

        let keys = self.store.lock().keys();
        let removed = keys
            .iter()
            .filter(|key| key.contains(pattern))
            .filter(|key| self.store.lock().invalidate_if(key, |_, _| true))
            .count();

        debug!("Invalidated {} entries matching '{}'", removed, pattern);
        removed
    }

    /// Removes every entry whose key contains `hash` or whose stored content
    /// fingerprint equals it. Returns the count.
    pub fn invalidate_by_content_fingerprint(&self, hash: &str) -> usize {
        if hash.is_empty() {
            warn!("Refusing to invalidate with an empty fingerprint");
            return 0;
        }

        let keys = self.store.lock().keys();
        let removed = keys
            .iter()
            .filter(|key| {
                self.store.lock().invalidate_if(key, |key, entry| {
                    key.contains(hash)
                        || entry
                            .content_fingerprint
                            .as_deref()
                            .is_some_and(|stored| stored.eq_ignore_ascii_case(hash))
                })
            })
            .count();

        debug!("Invalidated {} entries for fingerprint {}", removed, hash);
        removed
    }

    // == Maintenance ==
    /// Runs one expiry sweep immediately. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        sweep_expired(&self.store)
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    pub fn reset_stats(&self) {
        self.store.lock().reset_stats();
    }

    pub fn entry_info(&self, key: &str) -> Option<EntryInfo> {
        self.store.lock().entry_info(key)
    }

    /// True while the background sweep task is alive.
    pub fn is_cleanup_running(&self) -> bool {
        self.cleanup
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // == Shutdown ==
    /// Stops the background sweep. Cached entries stay readable.
    pub fn shutdown(&self) {
        if let Some(handle) = self.cleanup.lock().take() {
            handle.abort();
            info!("Cache cleanup task stopped");
        }
    }
}
