//! Factory for creating eviction policies

use lumen_config::EvictionPolicyKind;

use super::policies::{ArcPolicy, LfuPolicy, LruPolicy};
use super::traits::EvictionPolicy;

/// Build the policy selected in the configuration
///
/// `capacity` is the combined item capacity of both tiers; only ARC uses it.
pub fn create_eviction_policy(kind: EvictionPolicyKind, capacity: usize) -> Box<dyn EvictionPolicy> {
    match kind {
        EvictionPolicyKind::Lru => Box::new(LruPolicy::new()),
        EvictionPolicyKind::Lfu => Box::new(LfuPolicy::new()),
        EvictionPolicyKind::Arc => Box::new(ArcPolicy::new(capacity)),
    }
}
