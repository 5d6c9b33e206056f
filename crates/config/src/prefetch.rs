//! Prefetch and concurrency-gate settings

use lumen_core::{Error, Result, TargetSize, DEFAULT_GATE_CAPACITY, NAVIGATION_HISTORY_CAPACITY};
use serde::{Deserialize, Serialize};

/// Prefetch scheduler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefetchConfig {
    pub enabled: bool,
    /// Viewport size passed to the decoder; `None` decodes at native size
    pub target_size: Option<TargetSize>,
    /// Upper bound for the look-ahead window
    pub max_window: usize,
    /// Also preload the item behind the inferred direction
    pub include_behind: bool,
    pub history_capacity: usize,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_size: None,
            max_window: 2,
            include_behind: true,
            history_capacity: NAVIGATION_HISTORY_CAPACITY,
        }
    }
}

impl PrefetchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity < 2 {
            return Err(Error::configuration(format!(
                "history_capacity must be at least 2, got {}",
                self.history_capacity
            )));
        }
        Ok(())
    }
}

/// Concurrency gate and tuner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub initial_capacity: usize,
    pub min_capacity: usize,
    pub max_capacity: usize,
    /// Number of recent decodes the tuner scores
    pub sample_window: usize,
    /// Mean decode latency above which the tuner backs off
    pub slow_decode_ms: u64,
    /// Success rate below which the tuner backs off
    pub min_success_rate: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_GATE_CAPACITY,
            min_capacity: 1,
            max_capacity: DEFAULT_GATE_CAPACITY,
            sample_window: 20,
            slow_decode_ms: 800,
            min_success_rate: 0.8,
        }
    }
}

impl GateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_capacity == 0 {
            return Err(Error::configuration("min_capacity must be at least 1"));
        }
        if self.min_capacity > self.max_capacity {
            return Err(Error::configuration(format!(
                "min_capacity ({}) exceeds max_capacity ({})",
                self.min_capacity, self.max_capacity
            )));
        }
        if !(self.min_capacity..=self.max_capacity).contains(&self.initial_capacity) {
            return Err(Error::configuration(format!(
                "initial_capacity ({}) must lie in [{}, {}]",
                self.initial_capacity, self.min_capacity, self.max_capacity
            )));
        }
        if self.sample_window == 0 {
            return Err(Error::configuration("sample_window must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.min_success_rate) {
            return Err(Error::configuration(format!(
                "min_success_rate must be in [0, 1], got {}",
                self.min_success_rate
            )));
        }
        Ok(())
    }
}
