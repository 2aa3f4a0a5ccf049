//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries, so
//! write-once entries that are never read again do not sit in memory until
//! capacity pressure evicts them.

use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Removes every expired entry from `store`.
///
/// The key set is copied under the lock, then each key is checked and removed
/// under its own short lock acquisition, so concurrent `get`/`set` calls are
/// never blocked for more than a single removal.
pub fn sweep_expired(store: &Mutex<CacheStore>) -> usize {
    let keys = store.lock().keys();
    keys.iter()
        .filter(|key| store.lock().remove_if_expired(key))
        .count()
}

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task holds only a weak reference: once every cache handle is dropped
/// it exits on its next tick. Abort the returned handle to stop it earlier.
///
/// # Arguments
/// * `store` - Weak reference to the shared cache store
/// * `interval` - Time between sweeps
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::new(&CacheConfig::default())));
/// let cleanup_handle = spawn_cleanup_task(Arc::downgrade(&store), Duration::from_secs(300));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: Weak<Mutex<CacheStore>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting TTL cleanup task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let Some(store) = store.upgrade() else {
                debug!("Cache dropped, stopping TTL cleanup task");
                break;
            };

            let removed = sweep_expired(&store);

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
