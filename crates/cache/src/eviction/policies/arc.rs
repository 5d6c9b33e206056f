//! ARC (Adaptive Replacement Cache) eviction policy implementation
//!
//! Four ordered lists, oldest key first:
//! - T1: resident keys seen once recently
//! - T2: resident keys seen more than once
//! - B1/B2: ghost keys recently evicted from T1/T2 (metadata only)
//!
//! `p` is the target size of T1. A hit in B1 means recency would have paid
//! off, so `p` grows; a hit in B2 shrinks it in favour of frequency.

use crate::eviction::traits::EvictionPolicy;
use indexmap::IndexSet;
use lumen_config::EvictionPolicyKind;

/// ARC (Adaptive Replacement Cache) eviction policy
pub struct ArcPolicy {
    /// Target size for T1, always within `0..=c`
    p: usize,
    /// Item capacity of the cache
    c: usize,
    /// T1: recent cache entries
    t1: IndexSet<String>,
    /// T2: frequent cache entries
    t2: IndexSet<String>,
    /// B1: ghost entries recently evicted from T1
    b1: IndexSet<String>,
    /// B2: ghost entries recently evicted from T2
    b2: IndexSet<String>,
}

/// Sizes of the four ARC lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcLists {
    pub t1: usize,
    pub t2: usize,
    pub b1: usize,
    pub b2: usize,
}

impl ArcPolicy {
    pub fn new(capacity: usize) -> Self {
        Self {
            p: 0,
            c: capacity.max(1),
            t1: IndexSet::new(),
            t2: IndexSet::new(),
            b1: IndexSet::new(),
            b2: IndexSet::new(),
        }
    }

    /// Current target size of T1
    pub fn target_p(&self) -> usize {
        self.p
    }

    pub fn capacity(&self) -> usize {
        self.c
    }

    pub fn lists(&self) -> ArcLists {
        ArcLists {
            t1: self.t1.len(),
            t2: self.t2.len(),
            b1: self.b1.len(),
            b2: self.b2.len(),
        }
    }

    pub fn in_ghost_lists(&self, key: &str) -> bool {
        self.b1.contains(key) || self.b2.contains(key)
    }

    fn adapt(&mut self, in_b1: bool) {
        if in_b1 {
            // Increase p (favor recency)
            let delta = 1.max(self.b2.len() / self.b1.len());
            self.p = (self.p + delta).min(self.c);
        } else {
            // Decrease p (favor frequency)
            let delta = 1.max(self.b1.len() / self.b2.len());
            self.p = self.p.saturating_sub(delta);
        }
    }

    /// Shared path for reads and writes
    fn reference(&mut self, key: &str) {
        // Seen once before: promote to the frequent list
        if self.t1.shift_remove(key) {
            self.t2.insert(key.to_string());
            return;
        }

        // Already frequent: refresh position
        if self.t2.shift_remove(key) {
            self.t2.insert(key.to_string());
            return;
        }

        // Ghost hits adapt p before the key leaves the ghost list, so the
        // divisor is never zero
        if self.b1.contains(key) {
            self.adapt(true);
            self.b1.shift_remove(key);
            self.t2.insert(key.to_string());
            return;
        }

        if self.b2.contains(key) {
            self.adapt(false);
            self.b2.shift_remove(key);
            self.t2.insert(key.to_string());
            return;
        }

        self.t1.insert(key.to_string());
    }

    fn push_ghost(ghosts: &mut IndexSet<String>, key: &str, limit: usize) {
        ghosts.insert(key.to_string());
        while ghosts.len() > limit {
            ghosts.shift_remove_index(0);
        }
    }
}

impl EvictionPolicy for ArcPolicy {
    fn kind(&self) -> EvictionPolicyKind {
        EvictionPolicyKind::Arc
    }

    fn on_access(&mut self, key: &str) {
        self.reference(key);
    }

    fn on_put(&mut self, key: &str) {
        self.reference(key);
    }

    fn on_remove(&mut self, key: &str) {
        self.t1.shift_remove(key);
        self.t2.shift_remove(key);
        self.b1.shift_remove(key);
        self.b2.shift_remove(key);
    }

    fn on_evict(&mut self, key: &str) {
        if self.t1.shift_remove(key) {
            Self::push_ghost(&mut self.b1, key, self.c);
        } else if self.t2.shift_remove(key) {
            Self::push_ghost(&mut self.b2, key, self.c);
        }
    }

    fn select_eviction_candidate(&self, eligible: &dyn Fn(&str) -> bool) -> Option<String> {
        let first_eligible =
            |list: &IndexSet<String>| list.iter().find(|k| eligible(k.as_str())).cloned();

        // Drain T1 down to p first, then T2
        if self.t1.len() > self.p {
            first_eligible(&self.t1).or_else(|| first_eligible(&self.t2))
        } else {
            first_eligible(&self.t2).or_else(|| first_eligible(&self.t1))
        }
    }

    fn clear(&mut self) {
        self.p = 0;
        self.t1.clear();
        self.t2.clear();
        self.b1.clear();
        self.b2.clear();
    }

    fn len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }
}
