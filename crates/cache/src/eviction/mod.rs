//! Eviction policies for the unified cache
//!
//! Implements LRU, LFU, and ARC. A policy is chosen once, when the cache is
//! built, and is never re-dispatched per call.

mod factory;
mod policies;
mod traits;

// Re-export public API
pub use factory::create_eviction_policy;
pub use policies::{ArcLists, ArcPolicy, LfuPolicy, LruPolicy};
pub use traits::EvictionPolicy;

#[cfg(test)]
mod tests;
