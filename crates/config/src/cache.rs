//! Cache configuration with construction-time validation
//!
//! A [`CacheConfig`] is an immutable snapshot. It can only be obtained through
//! [`CacheConfigBuilder::build`] or through deserialisation, and both paths run
//! the same validation, so an invalid value is always a construction-time error.

use lumen_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Eviction algorithm used by the unified cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicyKind {
    /// Least recently used
    #[default]
    Lru,
    /// Least frequently used
    Lfu,
    /// Adaptive replacement cache
    Arc,
}

impl EvictionPolicyKind {
    pub const ALL: [EvictionPolicyKind; 3] = [Self::Lru, Self::Lfu, Self::Arc];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lru => "lru",
            Self::Lfu => "lfu",
            Self::Arc => "arc",
        }
    }
}

impl fmt::Display for EvictionPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lru" => Ok(Self::Lru),
            "lfu" => Ok(Self::Lfu),
            "arc" => Ok(Self::Arc),
            other => Err(Error::configuration_with_default(
                format!("unknown eviction policy: {other}"),
                Self::Lru.as_str(),
            )),
        }
    }
}

/// Immutable cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CacheConfigFile")]
pub struct CacheConfig {
    max_memory_mb: f64,
    cleanup_threshold: f64,
    active_capacity: usize,
    nearby_capacity: usize,
    preload_count: usize,
    eviction_policy: EvictionPolicyKind,
    max_entry_size_mb: f64,
    thread_safe: bool,
}

impl CacheConfig {
    /// Start from the defaults
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::new()
    }

    /// Total memory budget in megabytes
    pub fn max_memory_mb(&self) -> f64 {
        self.max_memory_mb
    }

    /// Fraction of the budget above which `cleanup` trims the nearby tier
    pub fn cleanup_threshold(&self) -> f64 {
        self.cleanup_threshold
    }

    pub fn active_capacity(&self) -> usize {
        self.active_capacity
    }

    pub fn nearby_capacity(&self) -> usize {
        self.nearby_capacity
    }

    /// Number of neighbours the application wants preloaded
    pub fn preload_count(&self) -> usize {
        self.preload_count
    }

    pub fn eviction_policy(&self) -> EvictionPolicyKind {
        self.eviction_policy
    }

    /// Largest single entry accepted by `put`
    pub fn max_entry_size_mb(&self) -> f64 {
        self.max_entry_size_mb
    }

    /// Accepted for configuration compatibility; the cache always locks
    pub fn thread_safe(&self) -> bool {
        self.thread_safe
    }

    /// Combined item capacity of both tiers
    pub fn total_capacity(&self) -> usize {
        self.active_capacity + self.nearby_capacity
    }

    /// Memory level at which `cleanup` starts trimming
    pub fn cleanup_watermark_mb(&self) -> f64 {
        self.max_memory_mb * self.cleanup_threshold
    }

    fn validate(self) -> Result<Self> {
        if !(self.max_memory_mb.is_finite() && self.max_memory_mb > 0.0) {
            return Err(Error::configuration(format!(
                "max_memory_mb must be positive, got {}",
                self.max_memory_mb
            )));
        }
        if !(self.cleanup_threshold > 0.0 && self.cleanup_threshold <= 1.0) {
            return Err(Error::configuration(format!(
                "cleanup_threshold must be in (0, 1], got {}",
                self.cleanup_threshold
            )));
        }
        if self.active_capacity == 0 {
            return Err(Error::configuration("active_capacity must be at least 1"));
        }
        if !(self.max_entry_size_mb.is_finite() && self.max_entry_size_mb > 0.0) {
            return Err(Error::configuration(format!(
                "max_entry_size_mb must be positive, got {}",
                self.max_entry_size_mb
            )));
        }
        Ok(self)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_memory_mb: 512.0,
            cleanup_threshold: 0.8,
            active_capacity: 10,
            nearby_capacity: 20,
            preload_count: 2,
            eviction_policy: EvictionPolicyKind::Lru,
            max_entry_size_mb: 100.0,
            thread_safe: true,
        }
    }
}

/// Builder for creating cache configurations
#[derive(Debug, Clone)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CacheConfig::default(),
        }
    }

    pub fn max_memory_mb(mut self, value: f64) -> Self {
        self.config.max_memory_mb = value;
        self
    }

    pub fn cleanup_threshold(mut self, value: f64) -> Self {
        self.config.cleanup_threshold = value;
        self
    }

    pub fn active_capacity(mut self, value: usize) -> Self {
        self.config.active_capacity = value;
        self
    }

    pub fn nearby_capacity(mut self, value: usize) -> Self {
        self.config.nearby_capacity = value;
        self
    }

    pub fn preload_count(mut self, value: usize) -> Self {
        self.config.preload_count = value;
        self
    }

    pub fn eviction_policy(mut self, value: EvictionPolicyKind) -> Self {
        self.config.eviction_policy = value;
        self
    }

    /// Set the policy by name, rejecting unknown names
    pub fn eviction_policy_name(self, name: &str) -> Result<Self> {
        let kind = name.parse()?;
        Ok(self.eviction_policy(kind))
    }

    pub fn max_entry_size_mb(mut self, value: f64) -> Self {
        self.config.max_entry_size_mb = value;
        self
    }

    pub fn thread_safe(mut self, value: bool) -> Self {
        self.config.thread_safe = value;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<CacheConfig> {
        self.config.validate()
    }
}

impl Default for CacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire form of [`CacheConfig`]; every field falls back to its default
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct CacheConfigFile {
    max_memory_mb: f64,
    cleanup_threshold: f64,
    active_capacity: usize,
    nearby_capacity: usize,
    preload_count: usize,
    eviction_policy: String,
    max_entry_size_mb: f64,
    thread_safe: bool,
}

impl Default for CacheConfigFile {
    fn default() -> Self {
        let defaults = CacheConfig::default();
        Self {
            max_memory_mb: defaults.max_memory_mb,
            cleanup_threshold: defaults.cleanup_threshold,
            active_capacity: defaults.active_capacity,
            nearby_capacity: defaults.nearby_capacity,
            preload_count: defaults.preload_count,
            eviction_policy: defaults.eviction_policy.to_string(),
            max_entry_size_mb: defaults.max_entry_size_mb,
            thread_safe: defaults.thread_safe,
        }
    }
}

impl TryFrom<CacheConfigFile> for CacheConfig {
    type Error = Error;

    fn try_from(file: CacheConfigFile) -> Result<Self> {
        CacheConfig {
            max_memory_mb: file.max_memory_mb,
            cleanup_threshold: file.cleanup_threshold,
            active_capacity: file.active_capacity,
            nearby_capacity: file.nearby_capacity,
            preload_count: file.preload_count,
            eviction_policy: file.eviction_policy.parse()?,
            max_entry_size_mb: file.max_entry_size_mb,
            thread_safe: file.thread_safe,
        }
        .validate()
    }
}
