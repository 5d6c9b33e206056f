//! LFU (Least Frequently Used) eviction policy implementation

use crate::eviction::traits::EvictionPolicy;
use indexmap::IndexMap;
use lumen_config::EvictionPolicyKind;

/// LFU (Least Frequently Used) eviction policy
///
/// Counts live in insertion order, so ties on the minimum count go to the key
/// that was inserted first.
pub struct LfuPolicy {
    /// Frequency counts per key
    frequencies: IndexMap<String, u64>,
}

impl LfuPolicy {
    pub fn new() -> Self {
        Self {
            frequencies: IndexMap::new(),
        }
    }

    /// Current access count for a key
    pub fn frequency(&self, key: &str) -> Option<u64> {
        self.frequencies.get(key).copied()
    }
}

impl Default for LfuPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl EvictionPolicy for LfuPolicy {
    fn kind(&self) -> EvictionPolicyKind {
        EvictionPolicyKind::Lfu
    }

    fn on_access(&mut self, key: &str) {
        if let Some(count) = self.frequencies.get_mut(key) {
            *count = count.saturating_add(1);
        }
    }

    fn on_put(&mut self, key: &str) {
        *self.frequencies.entry(key.to_string()).or_insert(0) += 1;
    }

    fn on_remove(&mut self, key: &str) {
        self.frequencies.shift_remove(key);
    }

    fn select_eviction_candidate(&self, eligible: &dyn Fn(&str) -> bool) -> Option<String> {
        let mut candidate: Option<(&String, u64)> = None;

        for (key, &freq) in &self.frequencies {
            if !eligible(key.as_str()) {
                continue;
            }
            match candidate {
                Some((_, best_freq)) if freq >= best_freq => {}
                _ => candidate = Some((key, freq)),
            }
        }

        candidate.map(|(key, _)| key.clone())
    }

    fn clear(&mut self) {
        self.frequencies.clear();
    }

    fn len(&self) -> usize {
        self.frequencies.len()
    }
}
