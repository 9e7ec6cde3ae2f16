//! ETag generation for cached payloads.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Computes a weak HTTP validator for any serializable value.
///
/// The value is first converted to a `serde_json::Value`, whose object maps are
/// key-sorted, so logically equal payloads always hash the same bytes.
pub fn fingerprint<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let canonical = serde_json::to_value(value)?;
    let bytes = serde_json::to_vec(&canonical)?;
    Ok(fingerprint_bytes(&bytes))
}

/// Weak validator over raw bytes.
pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("W/\"{}\"", hex::encode(hasher.finalize()))
}
