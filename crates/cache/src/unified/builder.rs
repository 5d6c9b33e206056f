//! Cache construction

use crate::eviction::create_eviction_policy;
use crate::stats::CacheCounters;
use crate::store::CacheStore;
use lumen_config::CacheConfig;
use lumen_core::EventBus;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::{CacheState, UnifiedCache};

impl<V> UnifiedCache<V> {
    /// Create an empty cache without an event sink
    pub fn new(config: CacheConfig) -> Self {
        Self::from_parts(Arc::new(config), None)
    }

    /// Create an empty cache that publishes to `events`
    pub fn with_event_bus(config: CacheConfig, events: EventBus) -> Self {
        Self::from_parts(Arc::new(config), Some(events))
    }

    /// Create an empty cache sharing an existing configuration snapshot
    pub fn from_parts(config: Arc<CacheConfig>, events: Option<EventBus>) -> Self {
        // ARC sizes its ghost lists from the combined item capacity
        let capacity = config.total_capacity().max(1);
        let policy = create_eviction_policy(config.eviction_policy(), capacity);

        debug!(
            policy = %config.eviction_policy(),
            max_memory_mb = config.max_memory_mb(),
            active_capacity = config.active_capacity(),
            nearby_capacity = config.nearby_capacity(),
            "Created unified cache"
        );
        if !config.thread_safe() {
            warn!("thread_safe = false is ignored; the cache is always synchronised");
        }

        Self {
            config,
            state: Mutex::new(CacheState {
                store: CacheStore::new(),
                policy,
            }),
            counters: CacheCounters::default(),
            events,
        }
    }
}

impl<V> Default for UnifiedCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
