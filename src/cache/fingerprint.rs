//! Content Fingerprint Module
//!
//! SHA-256 digests of binary payloads. Used as part of content-derived keys and
//! stored per entry so a validated read can detect that the underlying content
//! changed. This guards against accidental mismatch, not tampering.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `content` (64 lowercase characters).
pub fn fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// True when `content` hashes to `expected`.
pub fn matches(content: &[u8], expected: &str) -> bool {
    fingerprint(content).eq_ignore_ascii_case(expected)
}
