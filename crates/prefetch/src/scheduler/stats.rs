//! Scheduler counters and their snapshot

use lumen_core::Direction;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of the prefetch engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefetchStats {
    /// Current navigation generation
    pub generation: u64,
    /// Workers spawned, prefetch and background loads together
    pub launched: u64,
    /// Decodes that produced an image
    pub completed: u64,
    /// Size probes or decodes that failed
    pub failed: u64,
    /// Work dropped because the generation moved on
    pub stale_discarded: u64,
    /// Results written into the cache
    pub written: u64,
    /// Results the cache refused for lack of room
    pub rejected: u64,
    /// Prefetch results skipped because the item was already displayed
    pub skipped: u64,
    pub gate_capacity: usize,
    pub gate_rebuilds: u64,
    /// Window of the most recent plan
    pub window: usize,
    /// Direction of the most recent plan
    pub direction: Direction,
}

#[derive(Debug, Default)]
pub(crate) struct SchedulerCounters {
    pub launched: AtomicU64,
    pub completed: AtomicU64,
    pub failed: AtomicU64,
    pub stale_discarded: AtomicU64,
    pub written: AtomicU64,
    pub rejected: AtomicU64,
    pub skipped: AtomicU64,
}

impl SchedulerCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(counter: &AtomicU64, amount: u64) {
        counter.fetch_add(amount, Ordering::Relaxed);
    }

    pub fn load(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}
