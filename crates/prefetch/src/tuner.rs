//! Adaptive gate sizing from recent decode performance

use lumen_config::GateConfig;
use std::collections::VecDeque;
use std::time::Duration;

/// Fewer samples than this keep the gate at its initial capacity
pub const MIN_TUNING_SAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSample {
    pub success: bool,
    pub latency: Duration,
}

/// Summary of the sample window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceScore {
    pub success_rate: f64,
    pub avg_latency: Duration,
    pub samples: usize,
}

/// Rolling window of decode outcomes
#[derive(Debug, Clone)]
pub struct PerformanceTuner {
    config: GateConfig,
    samples: VecDeque<DecodeSample>,
}

impl PerformanceTuner {
    pub fn new(config: GateConfig) -> Self {
        let window = config.sample_window.max(1);
        Self {
            config,
            samples: VecDeque::with_capacity(window),
        }
    }

    pub fn record(&mut self, success: bool, latency: Duration) {
        if self.samples.len() >= self.config.sample_window.max(1) {
            self.samples.pop_front();
        }
        self.samples.push_back(DecodeSample { success, latency });
    }

    pub fn score(&self) -> PerformanceScore {
        let samples = self.samples.len();
        if samples == 0 {
            return PerformanceScore {
                success_rate: 1.0,
                avg_latency: Duration::ZERO,
                samples,
            };
        }
        let successes = self.samples.iter().filter(|sample| sample.success).count();
        let total: Duration = self.samples.iter().map(|sample| sample.latency).sum();
        PerformanceScore {
            success_rate: successes as f64 / samples as f64,
            avg_latency: total / samples as u32,
            samples,
        }
    }

    /// Gate capacity the current window calls for
    pub fn recommended_capacity(&self) -> usize {
        let score = self.score();
        if score.samples < MIN_TUNING_SAMPLES {
            return self.config.initial_capacity;
        }
        let slow = score.avg_latency > Duration::from_millis(self.config.slow_decode_ms);
        if score.success_rate < self.config.min_success_rate || slow {
            self.config.min_capacity
        } else {
            self.config.max_capacity
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
