//! Cache entry held by exactly one tier

use std::time::Instant;

/// Cached value plus the bookkeeping the tiers need
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Shared or owned handle to the cached object
    pub value: V,
    /// Charged memory in megabytes
    pub size_mb: f64,
    /// Caller-supplied priority; 1 is the most important
    pub priority: i32,
    /// Number of reads since insertion
    pub access_count: u64,
    pub created_at: Instant,
    pub last_access_at: Instant,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, size_mb: f64, priority: i32) -> Self {
        let now = Instant::now();
        Self {
            value,
            size_mb,
            priority,
            access_count: 0,
            created_at: now,
            last_access_at: now,
        }
    }

    /// Record a read
    pub fn touch(&mut self) {
        self.access_count = self.access_count.saturating_add(1);
        self.last_access_at = Instant::now();
    }

    /// Time since insertion
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }

    /// Time since the last read, or since insertion if never read
    pub fn idle(&self) -> std::time::Duration {
        self.last_access_at.elapsed()
    }
}
