//! LRU (Least Recently Used) eviction policy implementation

use crate::eviction::traits::EvictionPolicy;
use lru::LruCache;
use lumen_config::EvictionPolicyKind;
use std::time::Instant;

/// LRU (Least Recently Used) eviction policy
pub struct LruPolicy {
    /// Access order with the last-touch time of every key
    order: LruCache<String, Instant>,
}

impl LruPolicy {
    pub fn new() -> Self {
        Self {
            order: LruCache::unbounded(),
        }
    }

    /// When the key was last touched
    pub fn last_access(&self, key: &str) -> Option<Instant> {
        self.order.peek(key).copied()
    }
}

impl Default for LruPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl EvictionPolicy for LruPolicy {
    fn kind(&self) -> EvictionPolicyKind {
        EvictionPolicyKind::Lru
    }

    fn on_access(&mut self, key: &str) {
        // get_mut also moves the key to the most-recent end
        if let Some(touched) = self.order.get_mut(key) {
            *touched = Instant::now();
        }
    }

    fn on_put(&mut self, key: &str) {
        self.order.put(key.to_string(), Instant::now());
    }

    fn on_remove(&mut self, key: &str) {
        self.order.pop(key);
    }

    fn select_eviction_candidate(&self, eligible: &dyn Fn(&str) -> bool) -> Option<String> {
        // Iteration runs most-recent first; reverse to start at the LRU end
        self.order
            .iter()
            .rev()
            .map(|(key, _)| key)
            .find(|key| eligible(key.as_str()))
            .cloned()
    }

    fn clear(&mut self) {
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}
