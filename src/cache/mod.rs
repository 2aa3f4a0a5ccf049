//! Cache Module
//!
//! Provides the in-memory AI-result cache: content-derived keys, TTL
//! expiration, LRU eviction under byte and entry budgets, optional compression
//! and fingerprint validation of content-keyed entries.

mod compression;
mod entry;
pub mod fingerprint;
mod keys;
mod lru;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use compression::{CompressionHook, Payload};
pub use entry::{CacheEntry, EntryInfo};
pub(crate) use entry::duration_ms;
pub use keys::{canonical_json, KeyGenerator, CONTENT_MARKER};
pub use lru::LruTracker;
pub use shared::AiCache;
pub use stats::CacheStats;
pub use store::CacheStore;
