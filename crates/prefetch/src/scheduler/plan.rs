//! Prefetch candidate planning

use lumen_core::Direction;
use serde::{Deserialize, Serialize};

/// Priority of items ahead in the inferred direction
pub const AHEAD_PRIORITY: i32 = 1;
/// Priority of the item behind the current position
pub const BEHIND_PRIORITY: i32 = 2;

/// One item chosen for preloading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefetchCandidate {
    pub index: usize,
    pub key: String,
    pub priority: i32,
}

/// Outcome of planning around a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefetchPlan {
    pub direction: Direction,
    pub window: usize,
    pub candidates: Vec<PrefetchCandidate>,
}

impl PrefetchPlan {
    pub fn empty(direction: Direction) -> Self {
        Self {
            direction,
            window: 0,
            candidates: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.key.as_str()).collect()
    }
}

/// Indices to preload around `current` in a list of `len` items
///
/// Up to `window` indices ahead in `direction` get [`AHEAD_PRIORITY`]; with
/// `include_behind` the single index on the other side gets
/// [`BEHIND_PRIORITY`]. Out-of-range indices are dropped. A `Stay` direction
/// plans forward.
pub fn plan_candidates(
    current: usize,
    len: usize,
    direction: Direction,
    window: usize,
    include_behind: bool,
) -> Vec<(usize, i32)> {
    let step = match direction.step() {
        0 => 1,
        step => step,
    };
    let in_range = |offset: i64| -> Option<usize> {
        let index = i64::try_from(current).ok()?.checked_add(offset)?;
        usize::try_from(index).ok().filter(|index| *index < len)
    };

    let mut planned: Vec<(usize, i32)> = (1..=window as i64)
        .filter_map(|distance| in_range(step * distance))
        .map(|index| (index, AHEAD_PRIORITY))
        .collect();
    if include_behind {
        if let Some(index) = in_range(-step) {
            if !planned.iter().any(|(seen, _)| *seen == index) {
                planned.push((index, BEHIND_PRIORITY));
            }
        }
    }
    planned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_window_with_one_behind() {
        assert_eq!(
            plan_candidates(5, 10, Direction::Forward, 2, true),
            vec![(6, 1), (7, 1), (4, 2)]
        );
        assert_eq!(
            plan_candidates(5, 10, Direction::Forward, 1, false),
            vec![(6, 1)]
        );
    }

    #[test]
    fn backward_reverses_sides() {
        assert_eq!(
            plan_candidates(5, 10, Direction::Backward, 2, true),
            vec![(4, 1), (3, 1), (6, 2)]
        );
    }

    #[test]
    fn edges_drop_out_of_range_indices() {
        assert_eq!(plan_candidates(9, 10, Direction::Forward, 2, true), vec![(8, 2)]);
        assert_eq!(plan_candidates(0, 10, Direction::Backward, 2, true), vec![(1, 2)]);
        assert!(plan_candidates(0, 1, Direction::Forward, 2, true).is_empty());
        assert!(plan_candidates(0, 0, Direction::Forward, 2, true).is_empty());
    }

    #[test]
    fn stay_plans_forward() {
        assert_eq!(plan_candidates(2, 5, Direction::Stay, 1, false), vec![(3, 1)]);
    }

    #[test]
    fn zero_window_keeps_behind() {
        assert_eq!(plan_candidates(3, 5, Direction::Forward, 0, true), vec![(2, 2)]);
    }
}
