//! Lazily constructed shared cache
//!
//! A [`CacheRegistry`] is the context object components receive instead of a
//! process global: it builds one [`UnifiedCache`] on first use and hands out
//! shared handles to it afterwards.

use crate::UnifiedCache;
use lumen_config::CacheConfig;
use lumen_core::EventBus;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

/// Owner of one lazily built cache
pub struct CacheRegistry<V> {
    config: Arc<CacheConfig>,
    events: Option<EventBus>,
    cache: OnceCell<Arc<UnifiedCache<V>>>,
}

impl<V> CacheRegistry<V> {
    /// Registry that builds its cache from `config` on first use
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config: Arc::new(config),
            events: None,
            cache: OnceCell::new(),
        }
    }

    /// Attach an event bus to the cache this registry will build
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Registry around an already constructed cache
    pub fn with_cache(cache: Arc<UnifiedCache<V>>) -> Self {
        Self {
            config: cache.config_arc(),
            events: cache.event_bus().cloned(),
            cache: OnceCell::with_value(cache),
        }
    }

    /// The shared cache, constructed on the first call
    pub fn cache(&self) -> Arc<UnifiedCache<V>> {
        let cache = self.cache.get_or_init(|| {
            info!(
                policy = %self.config.eviction_policy(),
                max_memory_mb = self.config.max_memory_mb(),
                "Initialising shared cache"
            );
            Arc::new(UnifiedCache::from_parts(
                Arc::clone(&self.config),
                self.events.clone(),
            ))
        });
        Arc::clone(cache)
    }

    /// Whether the cache has been built yet
    pub fn is_initialized(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

impl<V> Default for CacheRegistry<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
