//! Background decode worker

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use lumen_core::Tier;
use tracing::{debug, warn};

use super::consumer::{ConsumerMessage, WorkerResult};
use super::stats::SchedulerCounters;
use super::SchedulerShared;
use crate::strategy::{select_strategy, LoadIntent, LoadStrategy};

/// What one worker loads
#[derive(Debug, Clone)]
pub(crate) struct Job {
    pub key: String,
    pub generation: u64,
    pub priority: i32,
    pub tier: Tier,
    /// Fixed strategy; `None` probes the source and selects one
    pub strategy: Option<LoadStrategy>,
}

/// Workers launched together by one prefetch call
#[derive(Debug)]
pub(crate) struct Batch {
    remaining: AtomicUsize,
}

impl Batch {
    pub fn new(size: usize) -> Arc<Self> {
        Arc::new(Self {
            remaining: AtomicUsize::new(size),
        })
    }
}

/// Retunes the gate when the last worker of a batch finishes, on every path
struct BatchGuard {
    batch: Arc<Batch>,
    shared: Arc<SchedulerShared>,
}

impl Drop for BatchGuard {
    fn drop(&mut self) {
        if self.batch.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.shared.retune();
        }
    }
}

pub(crate) async fn run(shared: Arc<SchedulerShared>, job: Job, batch: Option<Arc<Batch>>) {
    let _guard = batch.map(|batch| BatchGuard {
        batch,
        shared: Arc::clone(&shared),
    });
    let counters = &shared.counters;

    if let Err(e) = shared.generation.ensure_current(&job.key, job.generation) {
        SchedulerCounters::bump(&counters.stale_discarded);
        debug!(error = %e, "Skipped job before start");
        return;
    }

    let Some(permit) = shared.gate.acquire().await else {
        return;
    };

    if let Err(e) = shared.generation.ensure_current(&job.key, job.generation) {
        SchedulerCounters::bump(&counters.stale_discarded);
        debug!(error = %e, "Skipped job after acquiring the gate");
        return;
    }

    let strategy = match job.strategy {
        Some(strategy) => strategy,
        None => match shared.decoder.source_size_mb(&job.key).await {
            Ok(size_mb) => {
                let config = shared.strategy.read();
                select_strategy(size_mb, LoadIntent::Display, &config)
            }
            Err(e) => {
                SchedulerCounters::bump(&counters.failed);
                warn!(key = %job.key, error = %e, "Failed to probe prefetch source");
                return;
            }
        },
    };
    let target = shared.prefetch.read().target_size;

    let started = Instant::now();
    let decoded = shared.decoder.decode(&job.key, target, strategy).await;
    shared.tuner.lock().record(decoded.is_ok(), started.elapsed());
    drop(permit);

    let image = match decoded {
        Ok(image) => image,
        Err(e) => {
            SchedulerCounters::bump(&counters.failed);
            warn!(key = %job.key, %strategy, error = %e, "Background decode failed");
            return;
        }
    };
    SchedulerCounters::bump(&counters.completed);

    let result = WorkerResult {
        size_mb: image.size_mb(),
        key: job.key,
        image,
        generation: job.generation,
        priority: job.priority,
        tier: job.tier,
    };
    if shared
        .results
        .send(ConsumerMessage::Result(result))
        .await
        .is_err()
    {
        debug!("Result consumer gone; dropping decoded image");
    }
}
