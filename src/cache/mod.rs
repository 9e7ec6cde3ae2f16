//! Cache Module
//!
//! In-memory caching with TTL expiry, content fingerprints for conditional
//! requests, prefix invalidation and periodic sweeping.

mod entry;
mod etag;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use etag::{fingerprint, fingerprint_bytes};
pub use stats::{CacheStats, SweepReport};
pub use store::CacheStore;

// == Public Constants ==
/// Key prefix shared by every PRO listing cache entry
pub const PROS_PREFIX: &str = "pros:";
