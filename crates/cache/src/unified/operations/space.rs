//! Eviction, demotion and budget enforcement

use crate::stats::CacheCounters;
use crate::unified::types::{CacheState, UnifiedCache};
use lumen_core::{CacheEvent, Error, RecoveryHint, Result, Tier, EVICTION_ITERATION_SLACK};
use tracing::{debug, warn};

/// Tolerance for accumulated floating-point error in the budget check
const MEMORY_EPSILON_MB: f64 = 1e-9;

impl<V> UnifiedCache<V> {
    /// Evict until `size_mb` more fits within the memory budget
    ///
    /// Nearby victims go first. The loop is bounded by the item count plus a
    /// small slack so inconsistent policy state cannot spin forever.
    pub(super) fn ensure_space(
        &self,
        state: &mut CacheState<V>,
        key: &str,
        size_mb: f64,
    ) -> Result<()> {
        let max_mb = self.config.max_memory_mb();
        let max_iterations = state.store.total_items() + EVICTION_ITERATION_SLACK;
        let mut iterations = 0;

        while state.store.memory_mb() + size_mb > max_mb + MEMORY_EPSILON_MB {
            let victim = if iterations < max_iterations {
                match self.select_victim(state, Tier::Nearby) {
                    Some(victim) => Some(victim),
                    None => self.select_victim(state, Tier::Active),
                }
            } else {
                None
            };

            let Some((tier, victim)) = victim else {
                warn!(
                    key,
                    size_mb,
                    memory_mb = state.store.memory_mb(),
                    iterations,
                    "Could not free enough cache memory"
                );
                return Err(Error::EvictionExhausted {
                    key: key.to_string(),
                    requested_mb: size_mb,
                    current_mb: state.store.memory_mb(),
                    max_mb,
                    iterations,
                    recovery_hint: RecoveryHint::ClearAndRetry,
                });
            };

            iterations += 1;
            self.evict(state, tier, &victim);
        }
        Ok(())
    }

    /// Ask the policy for a victim in `tier`, falling back to the tier's oldest
    pub(super) fn select_victim(&self, state: &CacheState<V>, tier: Tier) -> Option<(Tier, String)> {
        let store = &state.store;
        state
            .policy
            .select_eviction_candidate(&|candidate: &str| store.tier_of(candidate) == Some(tier))
            .or_else(|| store.oldest(tier).map(str::to_string))
            .map(|victim| (tier, victim))
    }

    /// Drop an entry to make room and tell the policy
    pub(super) fn evict(&self, state: &mut CacheState<V>, tier: Tier, key: &str) -> bool {
        if state.store.take_from(tier, key).is_none() {
            return false;
        }
        state.policy.on_evict(key);
        CacheCounters::bump(&self.counters.evictions);
        debug!(key, %tier, "Evicted cache entry");
        self.publish(CacheEvent::Evict {
            key: key.to_string(),
            tier,
        });
        true
    }

    /// Demote the oldest Active entry other than `keep` while Active overflows
    pub(super) fn rebalance_active(&self, state: &mut CacheState<V>, keep: &str) {
        let active_capacity = self.config.active_capacity();

        while state.store.len(Tier::Active) > active_capacity {
            let Some(oldest) = state
                .store
                .oldest_except(Tier::Active, keep)
                .map(str::to_string)
            else {
                break;
            };

            if self.config.nearby_capacity() == 0 {
                self.evict(state, Tier::Active, &oldest);
                continue;
            }

            state.store.move_to(&oldest, Tier::Nearby);
            CacheCounters::bump(&self.counters.demotions);
            debug!(key = %oldest, "Demoted cache entry");
            self.publish(CacheEvent::Demote {
                key: oldest.clone(),
            });

            // A demoted entry is never demoted further; Nearby overflow evicts
            self.trim_nearby(state, Some(&oldest));
        }
    }

    /// Evict the oldest Nearby entries beyond capacity, sparing `keep`
    pub(super) fn trim_nearby(&self, state: &mut CacheState<V>, keep: Option<&str>) {
        let nearby_capacity = self.config.nearby_capacity();

        while state.store.len(Tier::Nearby) > nearby_capacity {
            let oldest = match keep {
                Some(keep) => state.store.oldest_except(Tier::Nearby, keep),
                None => state.store.oldest(Tier::Nearby),
            };
            let Some(oldest) = oldest.map(str::to_string) else {
                break;
            };
            self.evict(state, Tier::Nearby, &oldest);
        }
    }
}
