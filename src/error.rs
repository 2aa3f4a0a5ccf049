//! Error types for the result cache
//!
//! Provides unified error handling using thiserror. Cache operations never hand
//! these to callers on the request path; they are logged and degraded to a miss
//! or a skipped optimization. The admin HTTP surface maps them to responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty or otherwise unusable
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Value could not be serialized or decoded
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Gzip compression or decompression failed
    #[error("Compression failed: {0}")]
    Compression(#[from] std::io::Error),

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidKey(_) | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Serialization(_) | CacheError::Compression(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (CacheError::NotFound("key".to_string()), StatusCode::NOT_FOUND),
            (CacheError::InvalidKey("".to_string()), StatusCode::BAD_REQUEST),
            (CacheError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
            (
                CacheError::Compression(std::io::Error::new(std::io::ErrorKind::Other, "gz")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_serialization_error_from() {
        let err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let cache_err: CacheError = err.into();
        assert!(matches!(cache_err, CacheError::Serialization(_)));
        assert!(cache_err.to_string().starts_with("Serialization failed"));
    }
}
