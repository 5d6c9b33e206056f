//! Configuration types for lumen
//!
//! Every section is validated when it is built or deserialised; an invalid
//! value never reaches the cache or the prefetch engine.

pub mod cache;
pub mod config;
pub mod prefetch;
pub mod strategy;

pub use cache::{CacheConfig, CacheConfigBuilder, EvictionPolicyKind};
pub use config::ViewerConfig;
pub use prefetch::{GateConfig, PrefetchConfig};
pub use strategy::StrategyConfig;
