//! Two-tier in-memory cache for lumen
//!
//! This crate provides:
//! - An Active tier for displayed items and a Nearby tier for preloaded ones
//! - Pluggable eviction policies (LRU, LFU, ARC with ghost lists)
//! - A memory budget enforced on every write
//! - A registry that lazily builds one shared cache

pub mod entry;
pub mod eviction;
pub mod registry;
pub mod stats;
pub mod store;
pub mod unified;

pub use entry::CacheEntry;
pub use eviction::{create_eviction_policy, ArcPolicy, EvictionPolicy, LfuPolicy, LruPolicy};
pub use registry::CacheRegistry;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use unified::UnifiedCache;
