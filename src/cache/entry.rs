//! Cache Entry Module
//!
//! Defines a cached payload together with its content fingerprint and expiry.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

// == Cache Entry ==
/// A cached value, its ETag fingerprint and absolute expiry time.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Weak validator derived from the serialized value
    pub etag: String,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry expiring `ttl_seconds` from now.
    ///
    /// The fingerprint is computed by the caller so that entries are only ever
    /// built alongside a fresh etag/expiry pair.
    pub fn new(value: V, etag: String, ttl_seconds: u64) -> Self {
        Self {
            value,
            etag,
            expires_at: current_timestamp_ms().saturating_add(ttl_seconds.saturating_mul(1000)),
        }
    }

    // == Is Expired ==
    /// Expiry predicate shared by lazy lookups and the periodic sweep.
    ///
    /// An entry is stale once `now` has moved strictly past `expires_at`.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }

    /// Checks the entry against the current wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Time To Live ==
    /// Returns remaining TTL in seconds, `0` once expired.
    pub fn ttl_remaining(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms()) / 1000
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
