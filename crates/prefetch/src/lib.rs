//! Prefetch engine for lumen
//!
//! ## Key Components
//!
//! - **`navigation`**: rolling history of navigation steps, direction
//!   inference and the adaptive look-ahead window.
//! - **`generation`**: soft cancellation token shared with background work.
//! - **`strategy`**: maps source size and intent to a [`LoadStrategy`].
//! - **`gate`** and **`tuner`**: bounded decode concurrency, resized from
//!   recent decode performance.
//! - **`decoder`**: the [`Decoder`] collaborator interface.
//! - **`scheduler`**: plans and launches background decodes and writes their
//!   results into the cache.

pub mod decoder;
pub mod gate;
pub mod generation;
pub mod navigation;
pub mod scheduler;
pub mod strategy;
pub mod tuner;

pub use decoder::Decoder;
pub use gate::{ConcurrencyGate, GatePermit};
pub use generation::Generation;
pub use navigation::{window_for, NavigationEvent, NavigationTracker};
pub use scheduler::{
    plan_candidates, PrefetchCandidate, PrefetchPlan, PrefetchScheduler, PrefetchStats,
};
pub use strategy::{select_strategy, LoadIntent, LoadStrategy};
pub use tuner::{DecodeSample, PerformanceScore, PerformanceTuner};
