//! Explicit removal

use crate::unified::types::UnifiedCache;
use tracing::debug;

impl<V> UnifiedCache<V> {
    /// Remove a key from whichever tier holds it
    pub fn remove(&self, key: &str) -> bool {
        let mut state = self.lock();
        match state.store.take(key) {
            Some((tier, _)) => {
                state.policy.on_remove(key);
                debug!(key, %tier, "Removed cache entry");
                true
            }
            None => false,
        }
    }
}
