//! Two-tier unified cache
//!
//! [`UnifiedCache`] combines the [`CacheStore`](crate::store::CacheStore)
//! tiers with the configured eviction policy behind a single mutex:
//! - Active tier for displayed items, Nearby tier for preloaded ones
//! - Memory budget enforced on every write, Nearby victims first
//! - Promotion on a Nearby hit, demotion on Active overflow
//! - Conditional writes (`put_if`) checked inside the critical section
//!
//! Public operations never surface errors; `try_put` reports the reason.

mod builder;
mod operations;
mod types;

pub use types::UnifiedCache;

#[cfg(test)]
mod tests;
