//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache's correctness properties over generated
//! operation sequences.

use proptest::prelude::*;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use crate::cache::{AiCache, CacheStore, KeyGenerator};
use crate::config::CacheConfig;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_MAX_SIZE_BYTES: usize = 1024 * 1024;

fn test_config(max_entries: usize, max_size_bytes: usize) -> CacheConfig {
    CacheConfig::default()
        .with_max_entries(max_entries)
        .with_max_size_bytes(max_size_bytes)
        .with_cleanup_interval(std::time::Duration::ZERO)
}

fn test_store(max_entries: usize, max_size_bytes: usize) -> CacheStore {
    CacheStore::new(&test_config(max_entries, max_size_bytes))
}

// == Strategies ==
/// Generates valid cache keys (non-empty, within length limit)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}"
}

/// Generates cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,50}"
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Has { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Has { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn unique(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Hits and misses reflect exactly the get outcomes; has never counts.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = test_store(TEST_MAX_ENTRIES, TEST_MAX_SIZE_BYTES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(&key, &value, None);
                }
                CacheOp::Get { key } => match store.get::<String>(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Has { key } => {
                    store.has(&key);
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.entries, store.len(), "Entry count mismatch");
        prop_assert_eq!(stats.size_bytes, store.size_bytes(), "Size mismatch");
    }

    // Overwriting a key returns the newest value and keeps one entry.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let mut store = test_store(TEST_MAX_ENTRIES, TEST_MAX_SIZE_BYTES);

        store.set(&key, &value1, None);
        store.set(&key, &value2, None);

        prop_assert_eq!(store.get::<String>(&key), Some(value2.clone()));
        prop_assert_eq!(store.len(), 1);
        prop_assert_eq!(store.size_bytes(), value2.len() + 2);
    }

    // A deleted key is never served again.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = test_store(TEST_MAX_ENTRIES, TEST_MAX_SIZE_BYTES);

        store.set(&key, &value, None);
        prop_assert!(store.delete(&key));
        prop_assert_eq!(store.get::<String>(&key), None);
        prop_assert_eq!(store.size_bytes(), 0);
    }

    // After every set, both budgets hold.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..200
        ),
        max_entries in 1usize..50,
    ) {
        // Every generated value serializes to at most 52 bytes
        let max_size_bytes = 300;
        let mut store = test_store(max_entries, max_size_bytes);

        for (key, value) in entries {
            store.set(&key, &value, None);
            prop_assert!(
                store.len() <= max_entries,
                "Cache size {} exceeds max {}",
                store.len(),
                max_entries
            );
            prop_assert!(
                store.size_bytes() <= max_size_bytes,
                "Cache bytes {} exceed budget {}",
                store.size_bytes(),
                max_size_bytes
            );
        }
    }

    // With no reads, the first inserted key is the one evicted.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(valid_key_strategy(), 3..10),
        new_key in valid_key_strategy(),
    ) {
        let unique_keys = unique(initial_keys);
        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut store = test_store(capacity, TEST_MAX_SIZE_BYTES);

        for key in &unique_keys {
            store.set(key, &format!("value_{}", key), None);
        }
        store.set(&new_key, &"new", None);

        prop_assert_eq!(store.len(), capacity);
        prop_assert!(!store.has(&unique_keys[0]), "Oldest key should have been evicted");
        prop_assert!(store.has(&new_key));
        for key in unique_keys.iter().skip(1) {
            prop_assert!(store.has(key), "Key '{}' should still exist", key);
        }
    }

    // A read makes a key the most recently used.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(valid_key_strategy(), 3..8),
        new_key in valid_key_strategy(),
    ) {
        let unique_keys = unique(keys);
        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut store = test_store(capacity, TEST_MAX_SIZE_BYTES);

        for key in &unique_keys {
            store.set(key, &format!("value_{}", key), None);
        }

        let accessed_key = &unique_keys[0];
        prop_assert!(store.get::<String>(accessed_key).is_some());

        store.set(&new_key, &"new", None);

        prop_assert!(store.has(accessed_key), "Accessed key should not be evicted");
        prop_assert!(!store.has(&unique_keys[1]), "Second key should be evicted");
        prop_assert!(store.has(&new_key));
    }

    // Parameter keys ignore field construction order.
    #[test]
    fn prop_key_for_order_independent(
        fields in prop::collection::hash_map("[a-z]{1,8}", 0i64..1000, 1..10)
    ) {
        let forward: Map<String, Value> = fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(*v)))
            .collect();
        let mut entries: Vec<(String, Value)> = forward.clone().into_iter().collect();
        entries.reverse();
        let backward: Map<String, Value> = entries.into_iter().collect();

        prop_assert_eq!(
            KeyGenerator::key_for("svc", &Value::Object(forward)),
            KeyGenerator::key_for("svc", &Value::Object(backward))
        );
    }

    // Distinct buffers produce distinct content keys.
    #[test]
    fn prop_content_keys_distinguish_buffers(
        a in prop::collection::vec(any::<u8>(), 0..256),
        b in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            KeyGenerator::key_for_content("food", &a, "user", None),
            KeyGenerator::key_for_content("food", &b, "user", None)
        );
    }

    // A validated read never serves a value stored for different content.
    #[test]
    fn prop_content_validation(
        stored in prop::collection::vec(any::<u8>(), 1..128),
        presented in prop::collection::vec(any::<u8>(), 1..128),
        value in valid_value_strategy(),
    ) {
        let mut store = test_store(TEST_MAX_ENTRIES, TEST_MAX_SIZE_BYTES);
        let key = KeyGenerator::key_for_content("food", &stored, "user", None);
        store.set_with_fingerprint(&key, &value, &stored, None);

        let result = store.get_validated::<String>(&key, &presented);
        if stored == presented {
            prop_assert_eq!(result, Some(value));
        } else {
            prop_assert_eq!(result, None);
            prop_assert!(!store.has(&key));
        }
    }
}

// == Concurrent Operation Correctness ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Concurrent readers see complete values only and budgets hold at the end.
    #[test]
    fn prop_concurrent_operation_correctness(
        initial_entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..20
        ),
        operations in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        let max_entries = 16;
        let cache = Arc::new(AiCache::new(test_config(max_entries, TEST_MAX_SIZE_BYTES)));

        for (key, value) in &initial_entries {
            cache.set(key, value, None);
        }

        let handles: Vec<_> = operations
            .chunks(5)
            .map(|chunk| {
                let cache = Arc::clone(&cache);
                let chunk = chunk.to_vec();
                thread::spawn(move || {
                    for op in chunk {
                        match op {
                            CacheOp::Set { key, value } => {
                                cache.set(&key, &value, None);
                            }
                            CacheOp::Get { key } => {
                                if let Some(value) = cache.get::<String>(&key) {
                                    // Generated values are 1..=50 alphanumeric chars
                                    if value.is_empty() || value.len() > 50 {
                                        return Err(format!("Corrupted value for '{}'", key));
                                    }
                                }
                            }
                            CacheOp::Has { key } => {
                                cache.has(&key);
                            }
                            CacheOp::Delete { key } => {
                                cache.delete(&key);
                            }
                        }
                    }
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            let result = handle.join().expect("Worker thread should not panic");
            prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
        }

        let stats = cache.stats();
        prop_assert!(stats.entries <= max_entries);
        prop_assert!(stats.hit_rate >= 0.0 && stats.hit_rate <= 1.0);
    }
}
