//! Nutri Cache - AI result cache for food recognition and nutrition analysis
//!
//! Memoizes expensive AI inference results in process memory with
//! content-derived keys, TTL expiration, LRU eviction under byte and entry
//! budgets, and fingerprint validation of content-keyed entries.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{AiCache, CacheStats, KeyGenerator};
pub use config::{CacheConfig, Config};
pub use tasks::spawn_cleanup_task;
