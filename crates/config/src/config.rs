//! Centralized configuration for a lumen viewer
//!
//! [`ViewerConfig`] groups every section the core consumes. The configuration
//! collaborator owns where the text comes from; this crate only parses and
//! validates it.

use crate::cache::CacheConfig;
use crate::prefetch::{GateConfig, PrefetchConfig};
use crate::strategy::StrategyConfig;
use lumen_core::Result;
use serde::{Deserialize, Serialize};

/// All settings consumed by the viewer core
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub cache: CacheConfig,
    pub strategy: StrategyConfig,
    pub prefetch: PrefetchConfig,
    pub gate: GateConfig,
}

impl ViewerConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the sections that are not checked during deserialisation
    pub fn validate(&self) -> Result<()> {
        self.strategy.validate()?;
        self.prefetch.validate()?;
        self.gate.validate()?;
        Ok(())
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_prefetch(mut self, prefetch: PrefetchConfig) -> Self {
        self.prefetch = prefetch;
        self
    }

    pub fn with_gate(mut self, gate: GateConfig) -> Self {
        self.gate = gate;
        self
    }
}
