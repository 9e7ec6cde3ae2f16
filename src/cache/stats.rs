//! Cache Statistics Module
//!
//! Tracks lookup hits and misses for operational monitoring.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Lookups that returned a live entry
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Current number of entries in the cache
    pub entries: usize,
    /// Hit percentage rendered with two decimals, `"0%"` before any lookup
    pub hit_rate: String,
}

impl CacheStats {
    /// Builds a snapshot from raw counters.
    pub fn new(hits: u64, misses: u64, entries: usize) -> Self {
        Self {
            hits,
            misses,
            entries,
            hit_rate: format_hit_rate(hits, misses),
        }
    }

    /// Hit ratio in `[0, 1]`, `0.0` when no lookups happened yet.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Counters ==
/// Running hit/miss counters owned by the store.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub hits: u64,
    pub misses: u64,
}

impl Counters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn format_hit_rate(hits: u64, misses: u64) -> String {
    let total = hits + misses;
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.2}%", hits as f64 / total as f64 * 100.0)
}

// == Sweep Report ==
/// Outcome of a TTL sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Entries removed by the sweep
    pub cleaned: usize,
    /// Entry count before the sweep
    pub before: usize,
    /// Entry count after the sweep
    pub after: usize,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new(0, 0, 0);
        assert_eq!(stats.hit_rate, "0%");
        assert_eq!(stats.hit_ratio(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = CacheStats::new(7, 3, 1);
        assert_eq!(stats.hit_rate, "70.00%");
        assert!((stats.hit_ratio() - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_rate_rounding() {
        let stats = CacheStats::new(1, 2, 0);
        assert_eq!(stats.hit_rate, "33.33%");
    }

    #[test]
    fn test_counters_reset() {
        let mut counters = Counters::default();
        counters.record_hit();
        counters.record_miss();
        counters.record_miss();
        assert_eq!((counters.hits, counters.misses), (1, 2));

        counters.reset();
        assert_eq!((counters.hits, counters.misses), (0, 0));
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let json = serde_json::to_value(CacheStats::new(7, 3, 1)).unwrap();
        assert_eq!(json["hits"], 7);
        assert_eq!(json["misses"], 3);
        assert_eq!(json["entries"], 1);
        assert_eq!(json["hitRate"], "70.00%");
    }
}
