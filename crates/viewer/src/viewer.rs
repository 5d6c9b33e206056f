//! Foreground display and navigation

use std::sync::Arc;
use std::time::Instant;

use lumen_cache::UnifiedCache;
use lumen_config::{PrefetchConfig, StrategyConfig};
use lumen_core::{DecodedImage, Direction, Error, Result, TargetSize, Tier, TimedEvent};
use lumen_prefetch::{select_strategy, LoadIntent, LoadStrategy, PrefetchScheduler};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::stats::ViewerStats;

/// Priority of the item on screen
const DISPLAY_PRIORITY: i32 = 1;

#[derive(Debug)]
struct Position {
    items: Arc<Vec<String>>,
    index: usize,
}

impl Position {
    fn new(items: Vec<String>, start: usize) -> Self {
        let index = start.min(items.len().saturating_sub(1));
        Self {
            items: Arc::new(items),
            index,
        }
    }

    fn current(&self) -> Option<&String> {
        self.items.get(self.index)
    }
}

/// Image viewer over an ordered item list
#[derive(Debug)]
pub struct Viewer {
    cache: Arc<UnifiedCache<DecodedImage>>,
    scheduler: PrefetchScheduler,
    position: Mutex<Position>,
}

impl Viewer {
    pub(crate) fn new(
        cache: Arc<UnifiedCache<DecodedImage>>,
        scheduler: PrefetchScheduler,
        items: Vec<String>,
        start: usize,
    ) -> Self {
        Self {
            cache,
            scheduler,
            position: Mutex::new(Position::new(items, start)),
        }
    }

    /// Replace the item list; work launched for the old list is invalidated
    pub fn set_items(&self, items: Vec<String>, start: usize) {
        let count = items.len();
        *self.position.lock() = Position::new(items, start);
        let generation = self.scheduler.generation().advance();
        info!(items = count, generation, "Item list replaced");
    }

    /// Key of the current item
    pub fn current(&self) -> Option<String> {
        self.position.lock().current().cloned()
    }

    pub fn position(&self) -> usize {
        self.position.lock().index
    }

    pub fn item_count(&self) -> usize {
        self.position.lock().items.len()
    }

    /// Display `key`, or `None` when every decode strategy failed
    pub async fn show(&self, key: &str) -> Option<DecodedImage> {
        self.try_show(key).await.ok()
    }

    /// Display `key`, reporting why it could not be decoded
    ///
    /// A progressive decode returns the reduced first pass and replaces it in
    /// the cache with the full image once a background load finishes.
    pub async fn try_show(&self, key: &str) -> Result<DecodedImage> {
        self.load(key, LoadIntent::Display).await
    }

    /// Display `key` at preview resolution
    pub async fn show_preview(&self, key: &str) -> Option<DecodedImage> {
        self.load(key, LoadIntent::Preview).await.ok()
    }

    /// Step through the list, clamped at both ends
    ///
    /// Returns `Ok(None)` for an empty list.
    pub async fn navigate(&self, direction: Direction) -> Result<Option<DecodedImage>> {
        let (key, index, items) = {
            let mut position = self.position.lock();
            if position.items.is_empty() {
                return Ok(None);
            }
            let last = position.items.len() - 1;
            let next = match direction {
                Direction::Forward => (position.index + 1).min(last),
                Direction::Backward => position.index.saturating_sub(1),
                Direction::Stay => position.index,
            };
            position.index = next;
            (position.items[next].clone(), next, Arc::clone(&position.items))
        };

        self.arrive(key, index, items, direction).await
    }

    /// Move straight to `key`; `NotFound` when it is not in the item list
    pub async fn jump_to(&self, key: &str) -> Result<Option<DecodedImage>> {
        let (index, items, direction) = {
            let mut position = self.position.lock();
            let index = position
                .items
                .iter()
                .position(|item| item == key)
                .ok_or_else(|| Error::NotFound {
                    key: key.to_string(),
                })?;
            let direction = match index.cmp(&position.index) {
                std::cmp::Ordering::Greater => Direction::Forward,
                std::cmp::Ordering::Less => Direction::Backward,
                std::cmp::Ordering::Equal => Direction::Stay,
            };
            position.index = index;
            (index, Arc::clone(&position.items), direction)
        };

        self.arrive(key.to_string(), index, items, direction).await
    }

    async fn arrive(
        &self,
        key: String,
        index: usize,
        items: Arc<Vec<String>>,
        direction: Direction,
    ) -> Result<Option<DecodedImage>> {
        let generation = self.scheduler.begin_navigation(direction);
        let trimmed = self.cache.cleanup();
        if trimmed > 0 {
            debug!(trimmed, "Trimmed nearby tier");
        }

        let shown = self.try_show(&key).await;
        self.scheduler.prefetch(index, &items, generation);
        shown.map(Some)
    }

    async fn load(&self, key: &str, intent: LoadIntent) -> Result<DecodedImage> {
        let generation = self.scheduler.generation().current();
        if let Some(image) = self.cache.get(key) {
            // A first pass whose full decode was cancelled is reloaded on revisit
            if image.partial && intent == LoadIntent::Display {
                debug!(key, generation, "Cached image is partial; reloading full resolution");
                self.scheduler
                    .spawn_background_load(key, LoadStrategy::Auto, generation, Tier::Active);
            }
            return Ok(image);
        }

        let config = self.scheduler.strategy_config();
        let viewport = self.scheduler.prefetch_config().target_size;

        let strategy = match self.scheduler.decoder().source_size_mb(key).await {
            Ok(size_mb) => select_strategy(size_mb, intent, &config),
            Err(e) => {
                warn!(key, error = %e, "Could not probe source size; decoding generically");
                LoadStrategy::Auto
            }
        };

        let (image, used) = self.decode_with_fallback(key, strategy, viewport, &config).await?;
        if !self
            .cache
            .put(key, image.clone(), image.size_mb(), DISPLAY_PRIORITY, false)
        {
            warn!(key, size_mb = image.size_mb(), "Displayed image does not fit the cache");
        }
        if used.is_staged() {
            self.scheduler
                .spawn_background_load(key, LoadStrategy::Auto, generation, Tier::Active);
        }
        Ok(image)
    }

    async fn decode_with_fallback(
        &self,
        key: &str,
        strategy: LoadStrategy,
        viewport: Option<TargetSize>,
        config: &StrategyConfig,
    ) -> Result<(DecodedImage, LoadStrategy)> {
        let decoder = self.scheduler.decoder();
        let mut attempts = Vec::new();

        for candidate in strategy.fallback_chain() {
            let Some(permit) = self.scheduler.acquire_permit().await else {
                warn!(key, "Viewer is shut down; not decoding");
                break;
            };
            let target = candidate.target_for(viewport, config);
            let started = Instant::now();
            let decoded = decoder.decode(key, target, candidate).await;
            self.scheduler.record_decode(decoded.is_ok(), started.elapsed());
            drop(permit);

            match decoded {
                Ok(image) if candidate.is_staged() => return Ok((image.into_partial(), candidate)),
                Ok(image) => return Ok((image, candidate)),
                Err(e) => {
                    warn!(key, strategy = %candidate, error = %e, "Decode failed; trying next strategy");
                    attempts.push(candidate.as_str().to_string());
                }
            }
        }

        Err(Error::DecodeExhausted {
            path: key.to_string(),
            attempts,
        })
    }

    pub fn stats(&self) -> ViewerStats {
        let (position, item_count) = {
            let position = self.position.lock();
            (position.index, position.items.len())
        };
        ViewerStats {
            cache: self.cache.get_stats(),
            prefetch: self.scheduler.stats(),
            position,
            item_count,
        }
    }

    /// Swap the strategy thresholds; observed from the next show
    pub fn update_strategy_config(&self, config: StrategyConfig) -> Result<()> {
        config.validate()?;
        self.scheduler.update_strategy_config(config);
        Ok(())
    }

    /// Swap the prefetch settings; observed from the next navigation
    pub fn update_prefetch_config(&self, config: PrefetchConfig) -> Result<()> {
        config.validate()?;
        self.scheduler.update_prefetch_config(config);
        Ok(())
    }

    /// Cache events, when the cache was built with an event bus
    pub fn subscribe_events(&self) -> Option<broadcast::Receiver<TimedEvent>> {
        self.cache.subscribe()
    }

    pub fn cache(&self) -> &Arc<UnifiedCache<DecodedImage>> {
        &self.cache
    }

    pub fn scheduler(&self) -> &PrefetchScheduler {
        &self.scheduler
    }

    /// Wait for launched background work to land in the cache
    pub async fn settle(&self) {
        self.scheduler.settle().await;
    }

    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
        info!("Viewer shut down");
    }
}
