//! Key Generator Module
//!
//! Derives deterministic cache keys from structured parameters or from raw
//! content (a meal photo) plus the requesting user.
//!
//! Key shapes:
//! - parameter keys: `{namespace}:{sha256(canonical params)}`
//! - content keys: `{namespace}:content:{sha256(content hash | user | canonical extra)}`

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use super::fingerprint::fingerprint;

/// Marker segment identifying content-derived keys.
pub const CONTENT_MARKER: &str = ":content:";

// == Key Generator ==
/// Stateless key derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyGenerator;

impl KeyGenerator {
    // == Parameter Keys ==
    /// Key for a structured parameter set.
    ///
    /// Object keys are sorted recursively before hashing, so two parameter
    /// objects built in different field order map to the same key.
    pub fn key_for(namespace: &str, params: &Value) -> String {
        let mut hasher = Sha256::new();
        hasher.update(canonical_json(params).as_bytes());
        format!("{}:{}", namespace, hex::encode(hasher.finalize()))
    }

    // == Content Keys ==
    /// Key for binary content submitted by `user_id`.
    ///
    /// Identical bytes from the same user with the same extra parameters yield
    /// the same key; any byte difference yields a different one.
    pub fn key_for_content(
        namespace: &str,
        content: &[u8],
        user_id: &str,
        extra: Option<&Value>,
    ) -> String {
        let content_hash = fingerprint(content);

        let mut hasher = Sha256::new();
        hasher.update(content_hash.as_bytes());
        hasher.update(b"|");
        hasher.update(user_id.as_bytes());
        hasher.update(b"|");
        if let Some(extra) = extra {
            hasher.update(canonical_json(extra).as_bytes());
        }

        format!(
            "{}{}{}",
            namespace,
            CONTENT_MARKER,
            hex::encode(hasher.finalize())
        )
    }

    /// True when `key` was produced by [`KeyGenerator::key_for_content`].
    pub fn is_content_key(key: &str) -> bool {
        key.contains(CONTENT_MARKER)
    }
}

// == Canonical Form ==
/// Compact JSON with object keys sorted at every depth.
pub fn canonical_json(value: &Value) -> String {
    canonicalize(value).to_string()
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
