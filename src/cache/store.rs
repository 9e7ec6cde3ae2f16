//! Cache Store Module
//!
//! Keyed entries with TTL expiry, ETag fingerprints, prefix invalidation and
//! a periodic sweep.

use std::collections::HashMap;

use serde::Serialize;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::stats::Counters;
use crate::cache::{fingerprint, CacheEntry, CacheStats, SweepReport};
use crate::error::Result;

// == Cache Store ==
/// Process-wide cache of serializable values.
///
/// Expired entries are dropped lazily by [`CacheStore::get`] and eagerly by
/// [`CacheStore::sweep`]; both use [`CacheEntry::is_expired_at`].
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Lookup counters
    counters: Counters,
}

impl<V: Serialize + Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheStore<V>
where
    V: Serialize + Clone,
{
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            counters: Counters::default(),
        }
    }

    // == Get ==
    /// Returns the live entry for `key`.
    ///
    /// A missing or expired entry counts as a miss, and an expired one is
    /// removed on the spot.
    pub fn get(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let now = current_timestamp_ms();

        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.counters.record_hit();
                Some(entry.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.counters.record_miss();
                None
            }
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// The fingerprint and expiry are always recomputed.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl_seconds: u64) -> Result<CacheEntry<V>> {
        let etag = fingerprint(&value)?;
        let entry = CacheEntry::new(value, etag, ttl_seconds);
        self.entries.insert(key.into(), entry.clone());
        Ok(entry)
    }

    // == Invalidate ==
    /// Removes a single key, returning whether anything was removed.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Invalidate Prefix ==
    /// Removes every key starting with `prefix` and returns how many went.
    ///
    /// Plain string prefix match over a linear scan of the keys.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }

    // == Sweep ==
    /// Removes all entries whose expiry has passed.
    pub fn sweep(&mut self) -> SweepReport {
        let now = current_timestamp_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let after = self.entries.len();

        SweepReport {
            cleaned: before - after,
            before,
            after,
        }
    }

    // == Stats ==
    /// Returns a read-only snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(self.counters.hits, self.counters.misses, self.entries.len())
    }

    /// Zeroes the hit/miss counters.
    pub fn reset_stats(&mut self) {
        self.counters.reset();
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.counters.reset();
    }

    // == Length ==
    /// Number of stored entries, expired ones included until removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is physically present, regardless of expiry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[cfg(test)]
    pub(crate) fn force_expire(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.expires_at = 0;
        }
    }
}
