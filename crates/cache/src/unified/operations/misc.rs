//! Miscellaneous cache operations

use crate::stats::{hit_rate, CacheStats};
use crate::unified::types::UnifiedCache;
use lumen_config::CacheConfig;
use lumen_core::{CacheEvent, EventBus, Tier, TimedEvent};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

impl<V> UnifiedCache<V> {
    /// Check whether a key is cached in either tier
    pub fn contains(&self, key: &str) -> bool {
        self.lock().store.contains(key)
    }

    /// Which tier holds the key, if any
    pub fn tier_of(&self, key: &str) -> Option<Tier> {
        self.lock().store.tier_of(key)
    }

    /// Keys of a tier, least recently used first
    pub fn keys(&self, tier: Tier) -> Vec<String> {
        self.lock().store.keys(tier)
    }

    pub fn len(&self) -> usize {
        self.lock().store.total_items()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn memory_mb(&self) -> f64 {
        self.lock().store.memory_mb()
    }

    /// Drop every entry and reset the policy to its initial state
    ///
    /// Counters survive; use [`reset_stats`](Self::reset_stats) for those.
    pub fn clear(&self) -> usize {
        let mut state = self.lock();
        let removed = state.store.clear();
        state.policy.clear();
        info!(removed, "Cleared cache");
        self.publish(CacheEvent::Clear { removed });
        removed
    }

    /// Evict Nearby entries while usage is above the cleanup watermark
    ///
    /// Returns the number of entries evicted.
    pub fn cleanup(&self) -> usize {
        let watermark = self.config.cleanup_watermark_mb();
        let mut state = self.lock();
        let mut evicted = 0;

        while state.store.memory_mb() > watermark {
            let Some((tier, victim)) = self.select_victim(&state, Tier::Nearby) else {
                break;
            };
            if !self.evict(&mut state, tier, &victim) {
                break;
            }
            evicted += 1;
        }

        if evicted > 0 {
            info!(
                evicted,
                memory_mb = state.store.memory_mb(),
                watermark_mb = watermark,
                "Trimmed nearby tier"
            );
        }
        evicted
    }

    /// Snapshot sizes, memory and counters
    pub fn get_stats(&self) -> CacheStats {
        let state = self.lock();
        let counters = self.counters.snapshot();
        let hits = counters.active_hits + counters.nearby_hits;
        let current_memory_mb = state.store.memory_mb();
        let max_memory_mb = self.config.max_memory_mb();

        CacheStats {
            active_size: state.store.len(Tier::Active),
            nearby_size: state.store.len(Tier::Nearby),
            total_items: state.store.total_items(),
            current_memory_mb,
            max_memory_mb,
            memory_usage_pct: current_memory_mb / max_memory_mb * 100.0,
            hits,
            active_hits: counters.active_hits,
            nearby_hits: counters.nearby_hits,
            misses: counters.misses,
            hit_rate: hit_rate(hits, counters.misses),
            puts: counters.puts,
            rejected_puts: counters.rejected_puts,
            evictions: counters.evictions,
            promotions: counters.promotions,
            demotions: counters.demotions,
            policy: self.config.eviction_policy(),
        }
    }

    /// Zero all counters; entries are kept
    pub fn reset_stats(&self) {
        self.counters.reset();
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Shared handle to the configuration snapshot
    pub fn config_arc(&self) -> Arc<CacheConfig> {
        Arc::clone(&self.config)
    }

    pub fn event_bus(&self) -> Option<&EventBus> {
        self.events.as_ref()
    }

    /// Receive events published from now on, if an event bus is attached
    pub fn subscribe(&self) -> Option<broadcast::Receiver<TimedEvent>> {
        self.events.as_ref().map(EventBus::subscribe)
    }
}
