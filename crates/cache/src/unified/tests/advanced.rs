use super::{cache_with, value};
use crate::UnifiedCache;
use lumen_config::{CacheConfig, EvictionPolicyKind};
use lumen_core::{CacheEvent, EventBus, Tier};

#[test]
fn test_promotion_on_nearby_hit() {
    let cache = cache_with(2, 2, 100.0, EvictionPolicyKind::Lru);
    cache.put("a", value("a"), 1.0, 1, false);
    cache.put("b", value("b"), 1.0, 1, false);
    cache.put("c", value("c"), 1.0, 2, true);

    assert_eq!(cache.get("c"), Some(value("c")));

    // 'c' moved up, pushing Active's oldest down into the freed slot
    assert_eq!(cache.keys(Tier::Active), vec!["b".to_string(), "c".to_string()]);
    assert_eq!(cache.keys(Tier::Nearby), vec!["a".to_string()]);

    let stats = cache.get_stats();
    assert_eq!(stats.nearby_hits, 1);
    assert_eq!(stats.promotions, 1);
    assert_eq!(stats.demotions, 1);
    assert_eq!(stats.evictions, 0);
}

#[test]
fn test_second_get_after_promotion_is_plain_active_hit() {
    let cache = cache_with(2, 2, 100.0, EvictionPolicyKind::Lru);
    cache.put("n", value("n"), 1.0, 2, true);

    cache.get("n");
    let after_first = cache.get_stats();
    cache.get("n");
    let after_second = cache.get_stats();

    assert_eq!(cache.tier_of("n"), Some(Tier::Active));
    assert_eq!(after_second.promotions, after_first.promotions);
    assert_eq!(after_second.demotions, after_first.demotions);
    assert_eq!(after_second.active_hits, after_first.active_hits + 1);
    assert_eq!(after_second.nearby_hits, 1);
}

#[test]
fn test_active_overflow_demotes_then_nearby_overflow_evicts() {
    let cache = cache_with(2, 1, 100.0, EvictionPolicyKind::Lru);
    for key in ["a", "b", "c"] {
        assert!(cache.put(key, value(key), 1.0, 1, false));
    }
    assert_eq!(cache.keys(Tier::Nearby), vec!["a".to_string()]);

    assert!(cache.put("d", value("d"), 1.0, 1, false));
    assert_eq!(cache.keys(Tier::Active), vec!["c".to_string(), "d".to_string()]);
    assert_eq!(cache.keys(Tier::Nearby), vec!["b".to_string()]);
    assert!(!cache.contains("a"));

    let stats = cache.get_stats();
    assert_eq!(stats.demotions, 2);
    assert_eq!(stats.evictions, 1);
}

#[test]
fn test_active_overflow_without_nearby_tier_evicts() {
    let cache = cache_with(2, 0, 100.0, EvictionPolicyKind::Lru);
    for key in ["a", "b", "c"] {
        cache.put(key, value(key), 1.0, 1, false);
    }
    assert!(!cache.contains("a"));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get_stats().demotions, 0);
}

#[test]
fn test_nearby_overflow_spares_new_entry() {
    let cache = cache_with(4, 2, 100.0, EvictionPolicyKind::Lru);
    for key in ["n1", "n2", "n3"] {
        assert!(cache.put(key, value(key), 1.0, 2, true));
    }
    assert_eq!(cache.keys(Tier::Nearby), vec!["n2".to_string(), "n3".to_string()]);
}

#[test]
fn test_memory_pressure_evicts_nearby_first() {
    let cache = cache_with(5, 5, 4.0, EvictionPolicyKind::Lru);
    cache.put("a", value("a"), 2.0, 1, false);
    cache.put("n", value("n"), 2.0, 2, true);

    assert!(cache.put("b", value("b"), 2.0, 1, false));
    assert!(cache.contains("a"));
    assert!(cache.contains("b"));
    assert!(!cache.contains("n"));
    assert!(cache.memory_mb() <= 4.0);
}

#[test]
fn test_lru_evicts_first_inserted_under_memory_pressure() {
    let cache = cache_with(10, 10, 3.0, EvictionPolicyKind::Lru);
    for i in 0..4 {
        let key = format!("k{i}");
        assert!(cache.put(&key, value(&key), 1.0, 1, false));
    }
    assert!(!cache.contains("k0"));
    for i in 1..4 {
        assert!(cache.contains(&format!("k{i}")));
    }
}

#[test]
fn test_lru_respects_reads() {
    let cache = cache_with(10, 10, 3.0, EvictionPolicyKind::Lru);
    for key in ["a", "b", "c"] {
        cache.put(key, value(key), 1.0, 1, false);
    }
    cache.get("a");
    cache.put("d", value("d"), 1.0, 1, false);
    assert!(cache.contains("a"));
    assert!(!cache.contains("b"));
}

#[test]
fn test_arc_drains_recent_list_first() {
    let cache = cache_with(10, 10, 2.0, EvictionPolicyKind::Arc);
    cache.put("a", value("a"), 1.0, 1, false);
    cache.put("b", value("b"), 1.0, 1, false);

    // Second reference moves 'a' to the frequent list
    cache.get("a");
    cache.put("c", value("c"), 1.0, 1, false);

    assert!(cache.contains("a"));
    assert!(!cache.contains("b"));
    assert!(cache.contains("c"));
}

#[test]
fn test_put_if_rejected_predicate_changes_nothing() {
    let cache = cache_with(2, 2, 10.0, EvictionPolicyKind::Lru);
    assert!(!cache.put_if("a", value("a"), 1.0, 2, true, || false));
    assert!(cache.is_empty());

    let stats = cache.get_stats();
    assert_eq!((stats.puts, stats.rejected_puts), (0, 0));

    assert!(cache.put_if("a", value("a"), 1.0, 2, true, || true));
    assert_eq!(cache.tier_of("a"), Some(Tier::Nearby));
}

#[test]
fn test_cleanup_trims_nearby_to_watermark() {
    let config = CacheConfig::builder()
        .max_memory_mb(10.0)
        .cleanup_threshold(0.5)
        .active_capacity(10)
        .nearby_capacity(10)
        .build()
        .unwrap();
    let cache: UnifiedCache<String> = UnifiedCache::new(config);
    cache.put("a", value("a"), 3.0, 1, false);
    for key in ["n1", "n2", "n3"] {
        cache.put(key, value(key), 2.0, 2, true);
    }
    assert!((cache.memory_mb() - 9.0).abs() < 1e-9);

    // 9 MB against a 5 MB watermark: two nearby entries must go
    assert_eq!(cache.cleanup(), 2);
    assert_eq!(cache.keys(Tier::Nearby), vec!["n3".to_string()]);
    assert!(cache.contains("a"));
    assert_eq!(cache.cleanup(), 0);
}

#[test]
fn test_cleanup_never_touches_active() {
    let config = CacheConfig::builder()
        .max_memory_mb(10.0)
        .cleanup_threshold(0.1)
        .build()
        .unwrap();
    let cache: UnifiedCache<String> = UnifiedCache::new(config);
    cache.put("a", value("a"), 8.0, 1, false);
    assert_eq!(cache.cleanup(), 0);
    assert!(cache.contains("a"));
}

#[test]
fn test_events_are_published() {
    let bus = EventBus::new(16);
    let cache: UnifiedCache<String> = UnifiedCache::with_event_bus(CacheConfig::default(), bus);
    let mut events = cache.subscribe().expect("event bus attached");

    cache.put("a", value("a"), 1.0, 1, false);
    cache.get("a");
    cache.get("missing");
    cache.clear();

    let kinds: Vec<&str> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|timed| timed.event.name())
        .collect();
    assert_eq!(kinds, vec!["put", "hit", "miss", "clear"]);
}

#[test]
fn test_events_without_subscriber_are_dropped() {
    let bus = EventBus::new(4);
    let cache: UnifiedCache<String> =
        UnifiedCache::with_event_bus(CacheConfig::default(), bus.clone());
    cache.put("a", value("a"), 1.0, 1, false);
    cache.get("a");

    let stats = bus.stats();
    assert_eq!(stats.published, 2);
    assert_eq!(stats.dropped, 2);
}

#[test]
fn test_evict_event_names_tier() {
    let bus = EventBus::new(16);
    let config = CacheConfig::builder()
        .max_memory_mb(2.0)
        .build()
        .unwrap();
    let cache: UnifiedCache<String> = UnifiedCache::with_event_bus(config, bus);
    let mut events = cache.subscribe().unwrap();

    cache.put("n", value("n"), 2.0, 2, true);
    cache.put("a", value("a"), 2.0, 1, false);

    let evictions: Vec<CacheEvent> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|timed| timed.event)
        .filter(|event| matches!(event, CacheEvent::Evict { .. }))
        .collect();
    assert_eq!(
        evictions,
        vec![CacheEvent::Evict {
            key: "n".to_string(),
            tier: Tier::Nearby
        }]
    );
}

#[test]
fn test_unsynchronised_config_still_locks() {
    let config = CacheConfig::builder()
        .active_capacity(8)
        .nearby_capacity(8)
        .max_memory_mb(100.0)
        .thread_safe(false)
        .build()
        .unwrap();
    let cache = std::sync::Arc::new(UnifiedCache::<String>::new(config));

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let cache = std::sync::Arc::clone(&cache);
            std::thread::spawn(move || {
                for i in 0..50 {
                    let key = format!("{t}-{i}");
                    cache.put(&key, value(&key), 1.0, 1, i % 2 == 0);
                    cache.get(&key);
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let stats = cache.get_stats();
    assert!(stats.active_size <= 8);
    assert!(stats.nearby_size <= 8);
    assert_eq!(stats.total_items, stats.active_size + stats.nearby_size);
    assert!(stats.current_memory_mb <= 100.0);
}
