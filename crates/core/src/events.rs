//! Fire-and-forget observability events
//!
//! The cache publishes [`CacheEvent`]s on a broadcast channel so an external
//! collaborator can aggregate them. Publishing never blocks and never fails:
//! with no receiver attached, or with a lagging receiver, events are dropped.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::broadcast;

use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::types::Tier;

/// Cache events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CacheEvent {
    /// Entry served from a tier
    Hit { key: String, tier: Tier },
    /// Lookup found nothing
    Miss { key: String },
    /// Entry written
    Put { key: String, tier: Tier, size_mb: f64 },
    /// Entry evicted to make room
    Evict { key: String, tier: Tier },
    /// Nearby entry moved to the active tier on access
    Promote { key: String },
    /// Active entry pushed down to the nearby tier on overflow
    Demote { key: String },
    /// All entries dropped
    Clear { removed: usize },
}

impl CacheEvent {
    /// Short name for log fields and metrics labels
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CacheEvent::Hit { .. } => "hit",
            CacheEvent::Miss { .. } => "miss",
            CacheEvent::Put { .. } => "put",
            CacheEvent::Evict { .. } => "evict",
            CacheEvent::Promote { .. } => "promote",
            CacheEvent::Demote { .. } => "demote",
            CacheEvent::Clear { .. } => "clear",
        }
    }
}

/// Event with the time it was published
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedEvent {
    pub event: CacheEvent,
    pub timestamp: SystemTime,
}

/// Event statistics for monitoring
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStats {
    pub published: u64,
    pub dropped: u64,
}

/// Broadcast bus for cache events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TimedEvent>,
    published: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
}

impl EventBus {
    /// Create a new event bus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            published: Arc::new(AtomicU64::new(0)),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Publish an event without waiting for delivery
    pub fn publish(&self, event: CacheEvent) {
        self.published.fetch_add(1, Ordering::Relaxed);

        if self.sender.receiver_count() == 0 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let timed = TimedEvent {
            event,
            timestamp: SystemTime::now(),
        };
        if self.sender.send(timed).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<TimedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active receivers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn stats(&self) -> EventStats {
        EventStats {
            published: self.published.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receivers", &self.sender.receiver_count())
            .field("stats", &self.stats())
            .finish()
    }
}
