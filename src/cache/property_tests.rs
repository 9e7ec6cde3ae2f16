//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check counter accuracy, fingerprint determinism and the
//! invalidation contracts of the store.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashSet;

use crate::cache::{fingerprint, CacheStore};

const TEST_TTL: u64 = 300;

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "pros:[a-z0-9:.]{1,24}",
        "bookings:[a-z0-9]{1,12}",
        "[a-z]{1,8}:[a-z0-9]{1,12}",
    ]
}

fn payload_strategy() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-z0-9]{1,8}", -1000.0f64..1000.0), 0..6).prop_map(|items| {
        Value::Array(
            items
                .into_iter()
                .map(|(id, distance)| json!({"id": id, "distanceKm": distance}))
                .collect(),
        )
    })
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value },
    Get { key: String },
    Invalidate { key: String },
    InvalidatePrefix { prefix: String },
    Sweep,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), payload_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
        prop_oneof![Just("pros:".to_string()), Just("bookings:".to_string())]
            .prop_map(|prefix| CacheOp::InvalidatePrefix { prefix }),
        Just(CacheOp::Sweep),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // hits + misses always equals the number of lookups performed
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store: CacheStore<Value> = CacheStore::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key, value, TEST_TTL).unwrap();
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Invalidate { key } => {
                    store.invalidate(&key);
                }
                CacheOp::InvalidatePrefix { prefix } => {
                    store.invalidate_prefix(&prefix);
                }
                CacheOp::Sweep => {
                    store.sweep();
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.entries, store.len());
    }

    // A set followed by a get returns the same value and fingerprint
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in payload_strategy()) {
        let mut store: CacheStore<Value> = CacheStore::new();

        let stored = store.set(key.clone(), value.clone(), TEST_TTL).unwrap();
        let fetched = store.get(&key).unwrap();

        prop_assert_eq!(fetched.value, value);
        prop_assert_eq!(fetched.etag, stored.etag);
    }

    // Prefix invalidation removes exactly the matching keys
    #[test]
    fn prop_invalidate_prefix_exact(
        keys in prop::collection::hash_set(key_strategy(), 0..40),
        prefix in prop_oneof![Just("pros:"), Just("bookings:"), Just("p")],
    ) {
        let mut store: CacheStore<Value> = CacheStore::new();
        for key in &keys {
            store.set(key.clone(), json!(key), TEST_TTL).unwrap();
        }

        let matching: HashSet<&String> = keys.iter().filter(|k| k.starts_with(prefix)).collect();
        let removed = store.invalidate_prefix(prefix);

        prop_assert_eq!(removed, matching.len());
        prop_assert_eq!(store.len(), keys.len() - matching.len());
        for key in &keys {
            prop_assert_eq!(store.contains_key(key), !matching.contains(key));
        }
    }

    // Invalidating twice only reports a removal the first time
    #[test]
    fn prop_invalidate_idempotent(key in key_strategy(), present in any::<bool>()) {
        let mut store: CacheStore<Value> = CacheStore::new();
        if present {
            store.set(key.clone(), json!(1), TEST_TTL).unwrap();
        }

        prop_assert_eq!(store.invalidate(&key), present);
        prop_assert!(!store.invalidate(&key));
    }

    // Equal payloads fingerprint equally, different payloads differently
    #[test]
    fn prop_fingerprint_determinism(a in payload_strategy(), b in payload_strategy()) {
        let fa = fingerprint(&a).unwrap();
        let fb = fingerprint(&b).unwrap();

        prop_assert_eq!(fa.clone(), fingerprint(&a.clone()).unwrap());
        if serde_json::to_vec(&a).unwrap() == serde_json::to_vec(&b).unwrap() {
            prop_assert_eq!(fa, fb);
        } else {
            prop_assert_ne!(fa, fb);
        }
    }
}

// TTL behaviour uses the wall clock, so keep the case count low
proptest! {
    #![proptest_config(ProptestConfig::with_cases(3))]

    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in payload_strategy()) {
        let mut store: CacheStore<Value> = CacheStore::new();

        store.set(key.clone(), value.clone(), 1).unwrap();
        prop_assert_eq!(store.get(&key).map(|e| e.value), Some(value));

        std::thread::sleep(std::time::Duration::from_millis(1100));

        prop_assert!(store.get(&key).is_none());
        prop_assert_eq!(store.stats().entries, 0);
        prop_assert_eq!(store.sweep().cleaned, 0);
    }
}
