//! Core eviction policy trait definition

use lumen_config::EvictionPolicyKind;

/// Recency/frequency bookkeeping that nominates eviction victims
///
/// Policies only track keys; values and sizes stay in the store. All methods
/// are called with the cache lock held, so implementations need no interior
/// synchronisation.
pub trait EvictionPolicy: Send {
    /// Which algorithm this is
    fn kind(&self) -> EvictionPolicyKind;

    /// Record a read of a resident key
    fn on_access(&mut self, key: &str);

    /// Record a write of a key; a write of a tracked key counts as an access
    fn on_put(&mut self, key: &str);

    /// Forget a key that was explicitly removed
    fn on_remove(&mut self, key: &str);

    /// Record that a key was evicted to make room
    fn on_evict(&mut self, key: &str) {
        self.on_remove(key);
    }

    /// Nominate one resident key for eviction among those `eligible` accepts
    fn select_eviction_candidate(&self, eligible: &dyn Fn(&str) -> bool) -> Option<String>;

    /// Reset to the post-construction state
    fn clear(&mut self);

    /// Number of resident keys tracked
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
