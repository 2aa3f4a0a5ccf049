//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /cache/invalidate
///
/// Exactly one of the two selectors must be given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvalidateRequest {
    /// Substring matched against keys
    #[serde(default)]
    pub pattern: Option<String>,
    /// Hex SHA-256 of content whose entries should go
    #[serde(default)]
    pub fingerprint: Option<String>,
}

/// Validated invalidation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidateTarget {
    Pattern(String),
    Fingerprint(String),
}

impl InvalidateRequest {
    /// Validates the request data and resolves the selector.
    pub fn target(self) -> Result<InvalidateTarget, String> {
        match (self.pattern, self.fingerprint) {
            (Some(pattern), None) if !pattern.is_empty() => Ok(InvalidateTarget::Pattern(pattern)),
            (None, Some(hash)) if is_sha256_hex(&hash) => Ok(InvalidateTarget::Fingerprint(hash)),
            (None, Some(_)) => Err("Fingerprint must be a 64-character hex SHA-256".to_string()),
            (Some(_), Some(_)) => Err("Provide either pattern or fingerprint, not both".to_string()),
            _ => Err("Pattern cannot be empty".to_string()),
        }
    }
}

fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit())
}
