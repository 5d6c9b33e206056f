//! Core cache types and structures

use crate::eviction::EvictionPolicy;
use crate::stats::CacheCounters;
use crate::store::CacheStore;
use lumen_config::CacheConfig;
use lumen_core::{CacheEvent, EventBus};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Two-tier cache shared between the foreground path and background workers
pub struct UnifiedCache<V> {
    /// Immutable configuration snapshot
    pub(super) config: Arc<CacheConfig>,
    /// Tier maps and policy state, always locked together
    pub(super) state: Mutex<CacheState<V>>,
    pub(super) counters: CacheCounters,
    /// Observability sink; events are dropped when absent
    pub(super) events: Option<EventBus>,
}

pub(super) struct CacheState<V> {
    pub store: CacheStore<V>,
    pub policy: Box<dyn EvictionPolicy>,
}

impl<V> UnifiedCache<V> {
    pub(super) fn lock(&self) -> MutexGuard<'_, CacheState<V>> {
        self.state.lock()
    }

    pub(super) fn publish(&self, event: CacheEvent) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }
}

impl<V> std::fmt::Debug for UnifiedCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("UnifiedCache")
            .field("policy", &self.config.eviction_policy())
            .field("active", &state.store.len(lumen_core::Tier::Active))
            .field("nearby", &state.store.len(lumen_core::Tier::Nearby))
            .field("memory_mb", &state.store.memory_mb())
            .finish()
    }
}
