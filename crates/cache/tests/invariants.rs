//! Property-based tests for cache invariants
//!
//! Random operation sequences against random configurations must never break
//! the memory budget, the tier capacities or tier exclusivity.

use lumen_cache::{ArcPolicy, EvictionPolicy, UnifiedCache};
use lumen_config::{CacheConfig, EvictionPolicyKind};
use lumen_core::Tier;
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Put { key: u8, size_mb: f64, nearby: bool },
    Get { key: u8 },
    Remove { key: u8 },
    Cleanup,
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u8..12, 0.0f64..6.0, any::<bool>())
            .prop_map(|(key, size_mb, nearby)| Op::Put { key, size_mb, nearby }),
        4 => (0u8..12).prop_map(|key| Op::Get { key }),
        1 => (0u8..12).prop_map(|key| Op::Remove { key }),
        1 => Just(Op::Cleanup),
        1 => Just(Op::Clear),
    ]
}

fn arb_policy() -> impl Strategy<Value = EvictionPolicyKind> {
    prop_oneof![
        Just(EvictionPolicyKind::Lru),
        Just(EvictionPolicyKind::Lfu),
        Just(EvictionPolicyKind::Arc),
    ]
}

fn arb_config() -> impl Strategy<Value = CacheConfig> {
    (1usize..5, 0usize..5, 5.0f64..20.0, 0.3f64..1.0, arb_policy()).prop_map(
        |(active, nearby, max_memory_mb, threshold, policy)| {
            CacheConfig::builder()
                .active_capacity(active)
                .nearby_capacity(nearby)
                .max_memory_mb(max_memory_mb)
                .cleanup_threshold(threshold)
                .max_entry_size_mb(8.0)
                .eviction_policy(policy)
                .build()
                .expect("generated config is valid")
        },
    )
}

fn check_invariants(cache: &UnifiedCache<u8>) -> Result<(), TestCaseError> {
    let config = cache.config();
    let stats = cache.get_stats();

    prop_assert!(
        stats.current_memory_mb <= config.max_memory_mb() + 1e-6,
        "memory {} exceeds budget {}",
        stats.current_memory_mb,
        config.max_memory_mb()
    );
    prop_assert!(stats.current_memory_mb >= 0.0);
    prop_assert!(stats.active_size <= config.active_capacity());
    prop_assert!(stats.nearby_size <= config.nearby_capacity());
    prop_assert_eq!(stats.total_items, stats.active_size + stats.nearby_size);
    if stats.total_items == 0 {
        prop_assert_eq!(stats.current_memory_mb, 0.0);
    }

    let active: HashSet<String> = cache.keys(Tier::Active).into_iter().collect();
    let nearby: HashSet<String> = cache.keys(Tier::Nearby).into_iter().collect();
    prop_assert!(active.is_disjoint(&nearby), "key in both tiers");
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn cache_invariants_hold(config in arb_config(), ops in prop::collection::vec(arb_op(), 1..80)) {
        let cache: UnifiedCache<u8> = UnifiedCache::new(config);

        for op in ops {
            match op {
                Op::Put { key, size_mb, nearby } => {
                    let stored = cache.put(&format!("k{key}"), key, size_mb, 1, nearby);
                    if stored {
                        let k = format!("k{key}");
                        prop_assert!(cache.contains(&k));
                    }
                }
                Op::Get { key } => {
                    if let Some(found) = cache.get(&format!("k{key}")) {
                        prop_assert_eq!(found, key);
                    }
                }
                Op::Remove { key } => {
                    let key = format!("k{key}");
                    cache.remove(&key);
                    prop_assert!(!cache.contains(&key));
                }
                Op::Cleanup => {
                    cache.cleanup();
                }
                Op::Clear => {
                    cache.clear();
                    prop_assert!(cache.is_empty());
                }
            }
            check_invariants(&cache)?;
        }
    }

    #[test]
    fn arc_target_stays_within_capacity(
        capacity in 1usize..10,
        ops in prop::collection::vec((0u8..4, 0u8..20), 1..200),
    ) {
        let mut policy = ArcPolicy::new(capacity);

        for (action, key) in ops {
            let key = format!("k{key}");
            match action {
                0 => policy.on_put(&key),
                1 => policy.on_access(&key),
                2 => {
                    if let Some(victim) = policy.select_eviction_candidate(&|_: &str| true) {
                        policy.on_evict(&victim);
                    }
                }
                _ => policy.on_remove(&key),
            }

            prop_assert!(policy.target_p() <= policy.capacity());
            let lists = policy.lists();
            prop_assert!(lists.b1 <= capacity);
            prop_assert!(lists.b2 <= capacity);
            prop_assert_eq!(lists.t1 + lists.t2, policy.len());
        }
    }

    #[test]
    fn lru_evicts_first_inserted(n in 2usize..12) {
        let config = CacheConfig::builder()
            .active_capacity(n)
            .nearby_capacity(0)
            .max_memory_mb(1000.0)
            .build()
            .expect("valid config");
        let cache: UnifiedCache<usize> = UnifiedCache::new(config);

        for i in 0..=n {
            let k = format!("k{i}");
            prop_assert!(cache.put(&k, i, 1.0, 1, false));
        }

        prop_assert!(!cache.contains("k0"));
        for i in 1..=n {
            let k = format!("k{i}");
            prop_assert!(cache.contains(&k));
        }
    }
}
