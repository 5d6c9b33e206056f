//! Cache operations module

mod get;
mod misc;
mod put;
mod remove;
mod space;

// Operations are implemented directly on UnifiedCache
