//! Lookups with recency bookkeeping and promotion

use crate::stats::CacheCounters;
use crate::unified::types::{CacheState, UnifiedCache};
use lumen_core::{CacheEvent, Tier};
use tracing::debug;

impl<V: Clone> UnifiedCache<V> {
    /// Look up a key, refreshing its recency
    ///
    /// A Nearby hit promotes the entry to the back of the Active tier. A miss
    /// is counted and returns `None`; lookups never fail.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.lock();

        let Some(tier) = state.store.tier_of(key) else {
            CacheCounters::bump(&self.counters.misses);
            debug!(key, "Cache miss");
            self.publish(CacheEvent::Miss {
                key: key.to_string(),
            });
            return None;
        };

        let value = match tier {
            Tier::Active => {
                let value = state.store.touch(key).map(|(_, entry)| entry.value.clone());
                state.policy.on_access(key);
                CacheCounters::bump(&self.counters.active_hits);
                value
            }
            Tier::Nearby => self.promote(&mut state, key),
        };

        debug!(key, %tier, "Cache hit");
        self.publish(CacheEvent::Hit {
            key: key.to_string(),
            tier,
        });
        value
    }

    /// Move a Nearby entry into Active, demoting Active's oldest on overflow
    fn promote(&self, state: &mut CacheState<V>, key: &str) -> Option<V> {
        let mut entry = state.store.take_from(Tier::Nearby, key)?;
        entry.touch();
        let value = entry.value.clone();

        state.store.insert(Tier::Active, key.to_string(), entry);
        state.policy.on_access(key);
        CacheCounters::bump(&self.counters.nearby_hits);
        CacheCounters::bump(&self.counters.promotions);
        self.publish(CacheEvent::Promote {
            key: key.to_string(),
        });

        // The promoted entry freed a Nearby slot, so a demotion always fits
        self.rebalance_active(state, key);
        Some(value)
    }

    /// Read a value without touching recency, counters or tiers
    pub fn peek(&self, key: &str) -> Option<V> {
        let state = self.lock();
        state.store.get(key).map(|(_, entry)| entry.value.clone())
    }
}
