/// Constants used throughout the lumen codebase

// Memory accounting
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// Navigation history
pub const NAVIGATION_HISTORY_CAPACITY: usize = 8;
pub const DEFAULT_NAVIGATION_GAP_SECS: f64 = 0.5;

// Eviction loop slack on top of the item count
pub const EVICTION_ITERATION_SLACK: usize = 10;

// Concurrency gate
pub const DEFAULT_GATE_CAPACITY: usize = 2;

// Event bus
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

// Logging
pub const LUMEN_LOG_VAR: &str = "LUMEN_LOG";
