//! Cache statistics
//!
//! Counters are atomics so reads of the statistics never contend with the
//! tier lock; sizes and memory are read from the store when a snapshot is
//! taken.

use lumen_config::EvictionPolicyKind;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of a unified cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub active_size: usize,
    pub nearby_size: usize,
    pub total_items: usize,
    pub current_memory_mb: f64,
    pub max_memory_mb: f64,
    /// `current_memory_mb / max_memory_mb` as a percentage
    pub memory_usage_pct: f64,
    pub hits: u64,
    pub active_hits: u64,
    pub nearby_hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub puts: u64,
    pub rejected_puts: u64,
    pub evictions: u64,
    pub promotions: u64,
    pub demotions: u64,
    pub policy: EvictionPolicyKind,
}

/// Internal counters with atomic updates
#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    pub active_hits: AtomicU64,
    pub nearby_hits: AtomicU64,
    pub misses: AtomicU64,
    pub puts: AtomicU64,
    pub rejected_puts: AtomicU64,
    pub evictions: AtomicU64,
    pub promotions: AtomicU64,
    pub demotions: AtomicU64,
}

/// Plain copy of the counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CounterSnapshot {
    pub active_hits: u64,
    pub nearby_hits: u64,
    pub misses: u64,
    pub puts: u64,
    pub rejected_puts: u64,
    pub evictions: u64,
    pub promotions: u64,
    pub demotions: u64,
}

impl CacheCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            active_hits: self.active_hits.load(Ordering::Relaxed),
            nearby_hits: self.nearby_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            rejected_puts: self.rejected_puts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
            demotions: self.demotions.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.active_hits,
            &self.nearby_hits,
            &self.misses,
            &self.puts,
            &self.rejected_puts,
            &self.evictions,
            &self.promotions,
            &self.demotions,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl CacheStats {
    /// Total number of lookups
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Hit rate in `[0, 1]`; zero before the first lookup
pub(crate) fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_handles_no_lookups() {
        assert_eq!(hit_rate(0, 0), 0.0);
        assert_eq!(hit_rate(3, 1), 0.75);
    }

    #[test]
    fn reset_zeroes_every_counter() {
        let counters = CacheCounters::default();
        CacheCounters::bump(&counters.puts);
        CacheCounters::bump(&counters.evictions);
        CacheCounters::bump(&counters.misses);
        assert_eq!(counters.snapshot().puts, 1);

        counters.reset();
        assert_eq!(counters.snapshot(), CounterSnapshot::default());
    }
}
