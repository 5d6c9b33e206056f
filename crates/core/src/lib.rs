//! Core domain types, errors, and events for the lumen media cache.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias shared by every crate.
//!   Cache-internal failures are usually recovered locally; the typed errors
//!   exist for `try_*` APIs and for the foreground decode path.
//! - **`types`**: `Tier`, `Direction`, `TargetSize` and `DecodedImage`.
//! - **`events`**: fire-and-forget `CacheEvent`s on a broadcast `EventBus`.
//! - **`constants`**: shared numeric defaults.

pub mod constants;
pub mod errors;
pub mod events;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, RecoveryHint, Result},
    events::{CacheEvent, EventBus, EventStats, TimedEvent},
    types::*,
};
