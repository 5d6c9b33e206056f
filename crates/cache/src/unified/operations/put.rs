//! Writes with budget enforcement

use crate::entry::CacheEntry;
use crate::stats::CacheCounters;
use crate::unified::types::{CacheState, UnifiedCache};
use lumen_core::{CacheEvent, Error, RecoveryHint, Result, Tier};
use tracing::debug;

impl<V> UnifiedCache<V> {
    /// Insert or replace an entry
    ///
    /// Returns `false` without mutating the cache when the entry is too large
    /// or no room can be made for it.
    pub fn put(&self, key: &str, value: V, size_mb: f64, priority: i32, is_nearby: bool) -> bool {
        self.try_put(key, value, size_mb, priority, is_nearby).is_ok()
    }

    /// Like [`put`](Self::put), reporting why an entry was rejected
    pub fn try_put(
        &self,
        key: &str,
        value: V,
        size_mb: f64,
        priority: i32,
        is_nearby: bool,
    ) -> Result<()> {
        let mut state = self.lock();
        self.insert_locked(&mut state, key, value, size_mb, priority, tier_for(is_nearby))
    }

    /// Insert only if `still_valid` holds when the lock is taken
    ///
    /// The predicate runs inside the critical section, so a result whose
    /// validity is revoked concurrently is either written before the
    /// revocation or not at all. It must not call back into this cache.
    pub fn put_if<F>(
        &self,
        key: &str,
        value: V,
        size_mb: f64,
        priority: i32,
        is_nearby: bool,
        still_valid: F,
    ) -> bool
    where
        F: FnOnce() -> bool,
    {
        let mut state = self.lock();
        if !still_valid() {
            debug!(key, "Discarded conditional put");
            return false;
        }
        self.insert_locked(&mut state, key, value, size_mb, priority, tier_for(is_nearby))
            .is_ok()
    }

    fn insert_locked(
        &self,
        state: &mut CacheState<V>,
        key: &str,
        value: V,
        size_mb: f64,
        priority: i32,
        tier: Tier,
    ) -> Result<()> {
        match self.admit(state, key, value, size_mb, priority, tier) {
            Ok(()) => {
                CacheCounters::bump(&self.counters.puts);
                debug!(key, %tier, size_mb, memory_mb = state.store.memory_mb(), "Cached entry");
                self.publish(CacheEvent::Put {
                    key: key.to_string(),
                    tier,
                    size_mb,
                });
                Ok(())
            }
            Err(error) => {
                CacheCounters::bump(&self.counters.rejected_puts);
                debug!(key, %tier, size_mb, error = %error, "Rejected cache put");
                Err(error)
            }
        }
    }

    fn admit(
        &self,
        state: &mut CacheState<V>,
        key: &str,
        value: V,
        size_mb: f64,
        priority: i32,
        tier: Tier,
    ) -> Result<()> {
        self.check_admissible(key, size_mb, tier)?;

        // Detach a previous version so it neither counts against the budget
        // nor becomes its own eviction victim
        let detached = state.store.take(key);

        if let Err(error) = self.ensure_space(state, key, size_mb) {
            if let Some((previous_tier, entry)) = detached {
                state.store.insert(previous_tier, key.to_string(), entry);
            }
            return Err(error);
        }

        state
            .store
            .insert(tier, key.to_string(), CacheEntry::new(value, size_mb, priority));
        state.policy.on_put(key);

        match tier {
            Tier::Active => self.rebalance_active(state, key),
            Tier::Nearby => self.trim_nearby(state, Some(key)),
        }
        Ok(())
    }

    /// Reject entries that can never fit before anything is mutated
    fn check_admissible(&self, key: &str, size_mb: f64, tier: Tier) -> Result<()> {
        let max_entry = self.config.max_entry_size_mb();
        let max_memory = self.config.max_memory_mb();

        if !size_mb.is_finite() || size_mb < 0.0 {
            return Err(Error::CapacityExceeded {
                key: key.to_string(),
                requested_mb: size_mb,
                limit_mb: max_entry,
                recovery_hint: RecoveryHint::Manual {
                    instructions: "Entry sizes must be finite and non-negative".to_string(),
                },
            });
        }
        if size_mb > max_entry {
            return Err(Error::CapacityExceeded {
                key: key.to_string(),
                requested_mb: size_mb,
                limit_mb: max_entry,
                recovery_hint: RecoveryHint::IncreaseCapacity {
                    suggested_mb: size_mb,
                },
            });
        }
        if size_mb > max_memory {
            return Err(Error::CapacityExceeded {
                key: key.to_string(),
                requested_mb: size_mb,
                limit_mb: max_memory,
                recovery_hint: RecoveryHint::IncreaseCapacity {
                    suggested_mb: size_mb,
                },
            });
        }
        if tier == Tier::Nearby && self.config.nearby_capacity() == 0 {
            return Err(Error::TierUnavailable {
                key: key.to_string(),
                tier,
                reason: "nearby capacity is zero".to_string(),
            });
        }
        Ok(())
    }
}

fn tier_for(is_nearby: bool) -> Tier {
    if is_nearby {
        Tier::Nearby
    } else {
        Tier::Active
    }
}
