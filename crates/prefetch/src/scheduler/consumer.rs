//! Single consumer that writes worker results into the cache

use std::sync::Arc;

use lumen_cache::UnifiedCache;
use lumen_core::{DecodedImage, Tier};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::stats::SchedulerCounters;
use crate::generation::Generation;

/// Decoded item on its way to the cache
#[derive(Debug)]
pub(crate) struct WorkerResult {
    pub key: String,
    pub image: DecodedImage,
    pub size_mb: f64,
    pub generation: u64,
    pub priority: i32,
    pub tier: Tier,
}

#[derive(Debug)]
pub(crate) enum ConsumerMessage {
    Result(WorkerResult),
    /// Acknowledged once every earlier message was applied
    Flush(oneshot::Sender<()>),
    Shutdown,
}

pub(crate) struct ResultConsumer {
    cache: Arc<UnifiedCache<DecodedImage>>,
    generation: Generation,
    counters: Arc<SchedulerCounters>,
}

impl ResultConsumer {
    pub fn new(
        cache: Arc<UnifiedCache<DecodedImage>>,
        generation: Generation,
        counters: Arc<SchedulerCounters>,
    ) -> Self {
        Self {
            cache,
            generation,
            counters,
        }
    }

    /// Drain the channel until shutdown or until every sender is gone
    pub async fn run(self, mut receiver: mpsc::Receiver<ConsumerMessage>) {
        while let Some(message) = receiver.recv().await {
            match message {
                ConsumerMessage::Result(result) => self.apply(result),
                ConsumerMessage::Flush(ack) => {
                    let _ = ack.send(());
                }
                ConsumerMessage::Shutdown => break,
            }
        }
        debug!("Prefetch result consumer stopped");
    }

    fn apply(&self, result: WorkerResult) {
        let WorkerResult {
            key,
            image,
            size_mb,
            generation,
            priority,
            tier,
        } = result;

        // A displayed item is never pushed back down by its own prefetch
        if tier == Tier::Nearby && self.cache.tier_of(&key) == Some(Tier::Active) {
            SchedulerCounters::bump(&self.counters.skipped);
            debug!(key = %key, "Prefetch result already active");
            return;
        }

        let mut stale = false;
        let written = self.cache.put_if(
            &key,
            image,
            size_mb,
            priority,
            tier == Tier::Nearby,
            || {
                stale = !self.generation.is_current(generation);
                !stale
            },
        );

        if written {
            SchedulerCounters::bump(&self.counters.written);
            debug!(key = %key, %tier, size_mb, "Stored background result");
        } else if stale {
            SchedulerCounters::bump(&self.counters.stale_discarded);
            debug!(key = %key, generation, "Discarded stale result");
        } else {
            SchedulerCounters::bump(&self.counters.rejected);
            debug!(key = %key, size_mb, "Cache rejected background result");
        }
    }
}
