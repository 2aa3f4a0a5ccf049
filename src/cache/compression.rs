//! Compression Hook Module
//!
//! Gzip-compresses serialized payloads above a size threshold before they are
//! stored. Compression is best-effort: any failure, or output that is not
//! smaller than the input, leaves the payload raw.

use std::io::Read;

use flate2::read::{GzDecoder, GzEncoder};
use flate2::Compression;
use tracing::warn;

use crate::error::Result;

/// Stored payload bytes, tagged with their encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Serialized JSON as produced by serde_json
    Raw(Vec<u8>),
    /// Gzip stream of the serialized JSON
    Gzip(Vec<u8>),
}

impl Payload {
    /// Bytes held in memory, counted against the byte budget.
    pub fn stored_len(&self) -> usize {
        match self {
            Payload::Raw(bytes) | Payload::Gzip(bytes) => bytes.len(),
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, Payload::Gzip(_))
    }

    /// Returns the serialized JSON bytes, inflating if needed.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Payload::Raw(bytes) => Ok(bytes.clone()),
            Payload::Gzip(bytes) => decompress(bytes),
        }
    }
}

// == Compression Hook ==
/// Threshold-gated gzip policy.
#[derive(Debug, Clone)]
pub struct CompressionHook {
    enabled: bool,
    threshold_bytes: usize,
    level: u32,
}

impl CompressionHook {
    pub fn new(enabled: bool, threshold_bytes: usize) -> Self {
        Self {
            enabled,
            threshold_bytes,
            level: 6,
        }
    }

    /// Wraps serialized bytes into the payload to store.
    ///
    /// Returns the payload and the bytes saved (0 when left raw).
    pub fn apply(&self, raw: Vec<u8>) -> (Payload, usize) {
        if !self.enabled || raw.len() <= self.threshold_bytes {
            return (Payload::Raw(raw), 0);
        }

        match compress(&raw, self.level) {
            Ok(compressed) if compressed.len() < raw.len() => {
                let saved = raw.len() - compressed.len();
                (Payload::Gzip(compressed), saved)
            }
            Ok(_) => (Payload::Raw(raw), 0),
            Err(e) => {
                warn!("Compression failed, storing raw payload: {}", e);
                (Payload::Raw(raw), 0)
            }
        }
    }
}

fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(data, Compression::new(level));
    let mut compressed = Vec::new();
    encoder.read_to_end(&mut compressed)?;
    Ok(compressed)
}

fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}
