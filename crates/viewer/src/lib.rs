//! Caller-facing viewer for lumen
//!
//! A [`Viewer`] walks an ordered list of item keys. Showing an item reads the
//! cache first and decodes on a miss; every navigation step bumps the
//! generation, trims the cache and launches prefetch around the new position.

mod builder;
mod registry;
mod stats;
mod viewer;

pub use builder::ViewerBuilder;
pub use registry::default_registry;
pub use stats::ViewerStats;
pub use viewer::Viewer;

pub use lumen_prefetch::{Decoder, LoadIntent, LoadStrategy};
