//! Viewer construction

use std::sync::Arc;

use lumen_cache::{CacheRegistry, UnifiedCache};
use lumen_config::ViewerConfig;
use lumen_core::{DecodedImage, Error, EventBus, Result};
use lumen_prefetch::{Decoder, PrefetchScheduler};
use tracing::{info, warn};

use crate::viewer::Viewer;

/// Builder for [`Viewer`]
///
/// Without an injected cache or registry the viewer owns a fresh cache built
/// from the configuration.
pub struct ViewerBuilder {
    decoder: Arc<dyn Decoder>,
    config: ViewerConfig,
    cache: Option<Arc<UnifiedCache<DecodedImage>>>,
    events: Option<EventBus>,
    items: Vec<String>,
    start: usize,
}

impl ViewerBuilder {
    pub fn new(decoder: Arc<dyn Decoder>) -> Self {
        Self {
            decoder,
            config: ViewerConfig::default(),
            cache: None,
            events: None,
            items: Vec::new(),
            start: 0,
        }
    }

    pub fn config(mut self, config: ViewerConfig) -> Self {
        self.config = config;
        self
    }

    /// Use the cache held by `registry`, creating it if needed
    pub fn registry(mut self, registry: &CacheRegistry<DecodedImage>) -> Self {
        self.cache = Some(registry.cache());
        self
    }

    pub fn cache(mut self, cache: Arc<UnifiedCache<DecodedImage>>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Publish cache events on `events`; ignored when a cache is injected
    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn items(mut self, items: Vec<String>) -> Self {
        self.items = items;
        self
    }

    /// Initial position; clamped to the item list
    pub fn start(mut self, index: usize) -> Self {
        self.start = index;
        self
    }

    /// Validate the configuration and start the prefetch engine
    ///
    /// Must be called inside a tokio runtime.
    pub fn build(self) -> Result<Viewer> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(Error::configuration(
                "a viewer must be built inside a tokio runtime",
            ));
        }

        let mut config = self.config;
        config.validate()?;

        let cache = match self.cache {
            Some(cache) => {
                if cache.config() != &config.cache {
                    warn!("Injected cache overrides the configured cache section");
                    config.cache = cache.config().clone();
                }
                if self.events.is_some() {
                    warn!("Event bus ignored for an injected cache");
                }
                cache
            }
            None => Arc::new(match self.events {
                Some(events) => UnifiedCache::with_event_bus(config.cache.clone(), events),
                None => UnifiedCache::new(config.cache.clone()),
            }),
        };

        let scheduler = PrefetchScheduler::new(Arc::clone(&cache), self.decoder, &config);
        info!(
            items = self.items.len(),
            max_memory_mb = config.cache.max_memory_mb(),
            policy = %config.cache.eviction_policy(),
            "Viewer ready"
        );
        Ok(Viewer::new(cache, scheduler, self.items, self.start))
    }
}

impl std::fmt::Debug for ViewerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerBuilder")
            .field("config", &self.config)
            .field("items", &self.items.len())
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}
