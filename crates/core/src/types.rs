//! Shared domain types used across the lumen crates.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::BYTES_PER_MB;

/// Cache partition an entry lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Recently or currently displayed items
    Active,
    /// Speculatively preloaded items
    Nearby,
}

impl Tier {
    /// The tier an entry moves to when this one overflows or is hit
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Tier::Active => Tier::Nearby,
            Tier::Nearby => Tier::Active,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Active => f.write_str("active"),
            Tier::Nearby => f.write_str("nearby"),
        }
    }
}

/// Direction of a navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Backward,
    Stay,
    Forward,
}

impl Direction {
    /// Signed step: -1, 0 or +1
    #[must_use]
    pub const fn step(self) -> i64 {
        match self {
            Direction::Backward => -1,
            Direction::Stay => 0,
            Direction::Forward => 1,
        }
    }

    /// Build a direction from the sign of an offset
    #[must_use]
    pub const fn from_step(step: i64) -> Self {
        if step > 0 {
            Direction::Forward
        } else if step < 0 {
            Direction::Backward
        } else {
            Direction::Stay
        }
    }

    #[must_use]
    pub const fn is_moving(self) -> bool {
        !matches!(self, Direction::Stay)
    }

    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Backward => Direction::Forward,
            Direction::Stay => Direction::Stay,
            Direction::Forward => Direction::Backward,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Backward => f.write_str("backward"),
            Direction::Stay => f.write_str("stay"),
            Direction::Forward => f.write_str("forward"),
        }
    }
}

/// Requested decode resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale both sides down by `divisor`, never below one pixel
    #[must_use]
    pub fn scaled_down(self, divisor: u32) -> Self {
        let divisor = divisor.max(1);
        Self {
            width: (self.width / divisor).max(1),
            height: (self.height / divisor).max(1),
        }
    }

    /// Fit inside a square of `max_dimension`, keeping the aspect ratio
    #[must_use]
    pub fn capped(self, max_dimension: u32) -> Self {
        let longest = self.width.max(self.height);
        if longest <= max_dimension || longest == 0 {
            return self;
        }
        let ratio = f64::from(max_dimension) / f64::from(longest);
        Self {
            width: ((f64::from(self.width) * ratio).round() as u32).max(1),
            height: ((f64::from(self.height) * ratio).round() as u32).max(1),
        }
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Output of the decode collaborator
///
/// Pixel data is held in [`Bytes`], so cloning an image out of the cache
/// shares the buffer instead of copying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
    /// True when the decoder returned a reduced or incomplete result
    pub partial: bool,
}

impl DecodedImage {
    #[must_use]
    pub fn new(width: u32, height: u32, data: impl Into<Bytes>) -> Self {
        Self {
            width,
            height,
            data: data.into(),
            partial: false,
        }
    }

    #[must_use]
    pub fn into_partial(mut self) -> Self {
        self.partial = true;
        self
    }

    /// Memory footprint in megabytes, as charged against the cache budget
    #[must_use]
    pub fn size_mb(&self) -> f64 {
        self.data.len() as f64 / BYTES_PER_MB
    }

    #[must_use]
    pub fn dimensions(&self) -> TargetSize {
        TargetSize::new(self.width, self.height)
    }
}
