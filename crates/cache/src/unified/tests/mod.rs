//! Unit tests for the unified cache

mod advanced;

use crate::UnifiedCache;
use lumen_config::{CacheConfig, EvictionPolicyKind};

pub(super) fn cache_with(
    active: usize,
    nearby: usize,
    max_memory_mb: f64,
    policy: EvictionPolicyKind,
) -> UnifiedCache<String> {
    let config = CacheConfig::builder()
        .active_capacity(active)
        .nearby_capacity(nearby)
        .max_memory_mb(max_memory_mb)
        .max_entry_size_mb(max_memory_mb)
        .eviction_policy(policy)
        .build()
        .expect("valid test config");
    UnifiedCache::new(config)
}

pub(super) fn value(key: &str) -> String {
    format!("pixels:{key}")
}
