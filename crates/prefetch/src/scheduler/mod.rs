//! Navigation-driven prefetch engine
//!
//! Workers decode outside every lock and hand their results to a single
//! consumer task over a bounded channel. The consumer writes into the cache
//! with a generation check that runs under the cache lock, so work launched
//! before a navigation can never land after it.

mod consumer;
mod plan;
mod stats;
mod worker;

pub use plan::{plan_candidates, PrefetchCandidate, PrefetchPlan, AHEAD_PRIORITY, BEHIND_PRIORITY};
pub use stats::PrefetchStats;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use lumen_cache::UnifiedCache;
use lumen_config::{PrefetchConfig, StrategyConfig, ViewerConfig};
use lumen_core::{DecodedImage, Direction, Tier};
use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use self::consumer::{ConsumerMessage, ResultConsumer};
use self::stats::SchedulerCounters;
use self::worker::{Batch, Job};
use crate::decoder::Decoder;
use crate::gate::{ConcurrencyGate, GatePermit};
use crate::generation::Generation;
use crate::navigation::NavigationTracker;
use crate::strategy::LoadStrategy;
use crate::tuner::{PerformanceScore, PerformanceTuner};

/// Capacity of the worker result channel
pub const RESULT_CHANNEL_CAPACITY: usize = 1000;

/// State shared with workers
pub(crate) struct SchedulerShared {
    cache: Arc<UnifiedCache<DecodedImage>>,
    decoder: Arc<dyn Decoder>,
    generation: Generation,
    gate: ConcurrencyGate,
    tuner: Mutex<PerformanceTuner>,
    strategy: RwLock<StrategyConfig>,
    prefetch: RwLock<PrefetchConfig>,
    counters: Arc<SchedulerCounters>,
    results: mpsc::Sender<ConsumerMessage>,
}

impl SchedulerShared {
    /// Apply the tuner's recommendation to the gate
    fn retune(&self) {
        let recommended = self.tuner.lock().recommended_capacity();
        let applied = self.gate.set_capacity(recommended);
        debug!(recommended, applied, "Retuned concurrency gate");
    }
}

/// Schedules background decodes around the current position
pub struct PrefetchScheduler {
    shared: Arc<SchedulerShared>,
    tracker: Mutex<NavigationTracker>,
    last_plan: Mutex<(usize, Direction)>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    consumer: Mutex<Option<JoinHandle<()>>>,
}

impl PrefetchScheduler {
    /// Build a scheduler and start its result consumer
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(
        cache: Arc<UnifiedCache<DecodedImage>>,
        decoder: Arc<dyn Decoder>,
        config: &ViewerConfig,
    ) -> Self {
        let generation = Generation::new();
        let counters = Arc::new(SchedulerCounters::default());
        let (results, receiver) = mpsc::channel(RESULT_CHANNEL_CAPACITY);

        let consumer = ResultConsumer::new(
            Arc::clone(&cache),
            generation.clone(),
            Arc::clone(&counters),
        );
        let consumer = tokio::spawn(consumer.run(receiver));

        let shared = Arc::new(SchedulerShared {
            cache,
            decoder,
            generation,
            gate: ConcurrencyGate::new(&config.gate),
            tuner: Mutex::new(PerformanceTuner::new(config.gate.clone())),
            strategy: RwLock::new(config.strategy.clone()),
            prefetch: RwLock::new(config.prefetch.clone()),
            counters,
            results,
        });

        info!(
            gate_capacity = shared.gate.capacity(),
            max_window = config.prefetch.max_window,
            "Prefetch scheduler started"
        );

        Self {
            shared,
            tracker: Mutex::new(NavigationTracker::with_capacity(
                config.prefetch.history_capacity,
            )),
            last_plan: Mutex::new((0, Direction::Forward)),
            workers: Mutex::new(Vec::new()),
            consumer: Mutex::new(Some(consumer)),
        }
    }

    /// Record a navigation step and invalidate all launched work
    ///
    /// Returns the new generation.
    pub fn begin_navigation(&self, direction: Direction) -> u64 {
        self.tracker.lock().record(direction);
        let generation = self.shared.generation.advance();
        debug!(%direction, generation, "Navigation started");
        generation
    }

    /// Choose what to preload around `current`
    pub fn plan(&self, current: usize, items: &[String]) -> PrefetchPlan {
        let config = self.shared.prefetch.read().clone();
        let (window, direction) = {
            let tracker = self.tracker.lock();
            (tracker.compute_window(), tracker.infer_direction())
        };
        if !config.enabled || current >= items.len() {
            return PrefetchPlan::empty(direction);
        }

        let window = window
            .min(config.max_window)
            .min(self.shared.cache.config().preload_count());
        let current_key = items[current].as_str();
        let mut seen = HashSet::new();
        let candidates = plan_candidates(
            current,
            items.len(),
            direction,
            window,
            config.include_behind,
        )
        .into_iter()
        .filter_map(|(index, priority)| {
            let key = items[index].as_str();
            if key == current_key || !seen.insert(key) || self.shared.cache.contains(key) {
                return None;
            }
            Some(PrefetchCandidate {
                index,
                key: key.to_string(),
                priority,
            })
        })
        .collect();

        *self.last_plan.lock() = (window, direction);
        PrefetchPlan {
            direction,
            window,
            candidates,
        }
    }

    /// Plan around `current` and launch one worker per candidate
    pub fn prefetch(&self, current: usize, items: &[String], generation: u64) -> PrefetchPlan {
        let plan = self.plan(current, items);
        if plan.is_empty() {
            return plan;
        }

        let batch = Batch::new(plan.len());
        let jobs = plan.candidates.iter().map(|candidate| Job {
            key: candidate.key.clone(),
            generation,
            priority: candidate.priority,
            tier: Tier::Nearby,
            strategy: None,
        });
        let mut workers = self.workers.lock();
        workers.retain(|handle| !handle.is_finished());
        for job in jobs {
            let shared = Arc::clone(&self.shared);
            workers.push(tokio::spawn(worker::run(shared, job, Some(Arc::clone(&batch)))));
        }
        SchedulerCounters::add(&self.shared.counters.launched, plan.len() as u64);

        debug!(
            generation,
            direction = %plan.direction,
            window = plan.window,
            keys = ?plan.keys(),
            "Launched prefetch"
        );
        plan
    }

    /// Load one item in the background into `tier`
    ///
    /// Used for the full-resolution stage of a progressive display. The write
    /// is dropped if `generation` is no longer current when it lands.
    pub fn spawn_background_load(
        &self,
        key: &str,
        strategy: LoadStrategy,
        generation: u64,
        tier: Tier,
    ) {
        let job = Job {
            key: key.to_string(),
            generation,
            priority: AHEAD_PRIORITY,
            tier,
            strategy: Some(strategy),
        };
        let shared = Arc::clone(&self.shared);
        let mut workers = self.workers.lock();
        workers.retain(|handle| !handle.is_finished());
        workers.push(tokio::spawn(worker::run(shared, job, None)));
        SchedulerCounters::bump(&self.shared.counters.launched);
        debug!(key, %strategy, generation, %tier, "Launched background load");
    }

    /// Wait for every launched worker and for the consumer to apply their results
    pub async fn settle(&self) {
        loop {
            let handles = std::mem::take(&mut *self.workers.lock());
            if handles.is_empty() {
                break;
            }
            for joined in futures::future::join_all(handles).await {
                if let Err(e) = joined {
                    warn!(error = %e, "Prefetch worker panicked");
                }
            }
        }

        let (ack, done) = oneshot::channel();
        if self
            .shared
            .results
            .send(ConsumerMessage::Flush(ack))
            .await
            .is_ok()
        {
            let _ = done.await;
        }
    }

    /// Stop launching work, drain what is in flight and stop the consumer
    pub async fn shutdown(&self) {
        self.shared.gate.close();
        self.shared.generation.advance();
        self.settle().await;

        let _ = self.shared.results.send(ConsumerMessage::Shutdown).await;
        let consumer = self.consumer.lock().take();
        if let Some(consumer) = consumer {
            if let Err(e) = consumer.await {
                warn!(error = %e, "Result consumer panicked");
            }
            info!("Prefetch scheduler stopped");
        }
    }

    /// Wait for a foreground decode slot; `None` after shutdown
    pub async fn acquire_permit(&self) -> Option<GatePermit> {
        self.shared.gate.acquire().await
    }

    /// Feed a foreground decode outcome to the tuner
    pub fn record_decode(&self, success: bool, latency: Duration) {
        self.shared.tuner.lock().record(success, latency);
    }

    pub fn stats(&self) -> PrefetchStats {
        let counters = &self.shared.counters;
        let (window, direction) = *self.last_plan.lock();
        PrefetchStats {
            generation: self.shared.generation.current(),
            launched: SchedulerCounters::load(&counters.launched),
            completed: SchedulerCounters::load(&counters.completed),
            failed: SchedulerCounters::load(&counters.failed),
            stale_discarded: SchedulerCounters::load(&counters.stale_discarded),
            written: SchedulerCounters::load(&counters.written),
            rejected: SchedulerCounters::load(&counters.rejected),
            skipped: SchedulerCounters::load(&counters.skipped),
            gate_capacity: self.shared.gate.capacity(),
            gate_rebuilds: self.shared.gate.rebuilds(),
            window,
            direction,
        }
    }

    pub fn performance(&self) -> PerformanceScore {
        self.shared.tuner.lock().score()
    }

    pub fn update_strategy_config(&self, config: StrategyConfig) {
        *self.shared.strategy.write() = config;
        debug!("Strategy configuration updated");
    }

    pub fn update_prefetch_config(&self, config: PrefetchConfig) {
        self.tracker.lock().set_capacity(config.history_capacity);
        *self.shared.prefetch.write() = config;
        debug!("Prefetch configuration updated");
    }

    pub fn strategy_config(&self) -> StrategyConfig {
        self.shared.strategy.read().clone()
    }

    pub fn prefetch_config(&self) -> PrefetchConfig {
        self.shared.prefetch.read().clone()
    }

    pub fn generation(&self) -> &Generation {
        &self.shared.generation
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.shared.gate
    }

    pub fn cache(&self) -> &Arc<UnifiedCache<DecodedImage>> {
        &self.shared.cache
    }

    pub fn decoder(&self) -> &Arc<dyn Decoder> {
        &self.shared.decoder
    }
}

impl std::fmt::Debug for PrefetchScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefetchScheduler")
            .field("generation", &self.shared.generation.current())
            .field("gate_capacity", &self.shared.gate.capacity())
            .finish_non_exhaustive()
    }
}
