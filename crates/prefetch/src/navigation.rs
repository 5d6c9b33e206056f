//! Navigation history and look-ahead window heuristic
//!
//! The tracker keeps the last few navigation steps in a ring. Fast and
//! directionally consistent browsing earns a deeper look-ahead window; slow or
//! erratic browsing gets a window of one.

use lumen_core::{Direction, DEFAULT_NAVIGATION_GAP_SECS, NAVIGATION_HISTORY_CAPACITY};
use std::collections::VecDeque;
use std::time::Instant;

/// One recorded navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationEvent {
    pub timestamp: Instant,
    pub direction: Direction,
}

/// Window size for a given step gap and direction consistency
///
/// The thresholds are literal boundary values: a window of 2 needs either a
/// gap under 0.25 s with more than 60% of moves in the latest direction, or a
/// gap under 0.5 s with more than 50%.
pub fn window_for(dt_secs: f64, same_dir_ratio: f64) -> usize {
    if (dt_secs < 0.25 && same_dir_ratio > 0.6) || (dt_secs < 0.5 && same_dir_ratio > 0.5) {
        2
    } else {
        1
    }
}

/// Bounded ring of recent navigation events
#[derive(Debug, Clone)]
pub struct NavigationTracker {
    history: VecDeque<NavigationEvent>,
    capacity: usize,
}

impl NavigationTracker {
    pub fn new() -> Self {
        Self::with_capacity(NAVIGATION_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a step taken now
    pub fn record(&mut self, direction: Direction) {
        self.record_at(direction, Instant::now());
    }

    /// Record a step taken at `timestamp`, dropping the oldest beyond capacity
    pub fn record_at(&mut self, direction: Direction, timestamp: Instant) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(NavigationEvent {
            timestamp,
            direction,
        });
    }

    /// Most recent moving direction, forward when there is none
    pub fn infer_direction(&self) -> Direction {
        self.latest_moving().unwrap_or(Direction::Forward)
    }

    fn latest_moving(&self) -> Option<Direction> {
        self.history
            .iter()
            .rev()
            .map(|event| event.direction)
            .find(|direction| direction.is_moving())
    }

    /// Seconds between the two most recent events
    pub fn last_gap_secs(&self) -> f64 {
        let mut recent = self.history.iter().rev();
        match (recent.next(), recent.next()) {
            (Some(last), Some(previous)) => last
                .timestamp
                .saturating_duration_since(previous.timestamp)
                .as_secs_f64(),
            _ => DEFAULT_NAVIGATION_GAP_SECS,
        }
    }

    /// Share of moving events that match the latest moving direction
    pub fn same_direction_ratio(&self) -> f64 {
        let Some(latest) = self.latest_moving() else {
            return 0.0;
        };
        let (matching, moving) = self
            .history
            .iter()
            .filter(|event| event.direction.is_moving())
            .fold((0usize, 0usize), |(matching, moving), event| {
                (matching + usize::from(event.direction == latest), moving + 1)
            });
        matching as f64 / moving as f64
    }

    /// Look-ahead window for the current history
    pub fn compute_window(&self) -> usize {
        window_for(self.last_gap_secs(), self.same_direction_ratio())
    }

    /// Events per second across the recorded span
    pub fn velocity(&self) -> f64 {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return 0.0;
        };
        let span = last.timestamp.saturating_duration_since(first.timestamp).as_secs_f64();
        if span <= 0.0 {
            return 0.0;
        }
        (self.history.len() - 1) as f64 / span
    }

    /// Change the ring size, keeping the most recent events
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(2);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn events(&self) -> impl Iterator<Item = &NavigationEvent> {
        self.history.iter()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for NavigationTracker {
    fn default() -> Self {
        Self::new()
    }
}
