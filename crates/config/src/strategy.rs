//! Load-strategy thresholds

use lumen_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Thresholds consumed by the load-strategy selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Files at or below this size are decoded in one shot
    pub fast_threshold_mb: f64,
    /// Files at or above this size are decoded progressively
    pub progressive_threshold_mb: f64,
    pub progressive_enabled: bool,
    /// Longest side of a preview decode
    pub preview_max_dimension: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            fast_threshold_mb: 2.0,
            progressive_threshold_mb: 15.0,
            progressive_enabled: true,
            preview_max_dimension: 1024,
        }
    }
}

impl StrategyConfig {
    /// Check thresholds are positive and ordered
    pub fn validate(&self) -> Result<()> {
        if !(self.fast_threshold_mb.is_finite() && self.fast_threshold_mb > 0.0) {
            return Err(Error::configuration(format!(
                "fast_threshold_mb must be positive, got {}",
                self.fast_threshold_mb
            )));
        }
        if !(self.progressive_threshold_mb.is_finite() && self.progressive_threshold_mb > 0.0) {
            return Err(Error::configuration(format!(
                "progressive_threshold_mb must be positive, got {}",
                self.progressive_threshold_mb
            )));
        }
        if self.fast_threshold_mb > self.progressive_threshold_mb {
            return Err(Error::configuration(format!(
                "fast_threshold_mb ({}) must not exceed progressive_threshold_mb ({})",
                self.fast_threshold_mb, self.progressive_threshold_mb
            )));
        }
        if self.preview_max_dimension == 0 {
            return Err(Error::configuration("preview_max_dimension must be at least 1"));
        }
        Ok(())
    }
}
