//! Navigation generation counter
//!
//! Background work captures the generation when it launches and writes its
//! result only if the generation is still current. Advancing the counter
//! cancels all outstanding work softly: nothing is interrupted, results are
//! just discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lumen_core::{Error, Result};

/// Shared monotonic counter handle
#[derive(Debug, Clone, Default)]
pub struct Generation {
    value: Arc<AtomicU64>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }

    /// Invalidate all outstanding work, returning the new generation
    pub fn advance(&self) -> u64 {
        self.value.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }

    /// `StaleGeneration` when work on `key` captured an older generation
    pub fn ensure_current(&self, key: &str, generation: u64) -> Result<()> {
        let current = self.current();
        if current == generation {
            Ok(())
        } else {
            Err(Error::StaleGeneration {
                key: key.to_string(),
                expected: generation,
                current,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_invalidates_previous() {
        let generation = Generation::new();
        let captured = generation.current();
        assert!(generation.is_current(captured));

        let next = generation.advance();
        assert_eq!(next, captured + 1);
        assert!(!generation.is_current(captured));
        assert!(generation.is_current(next));
    }

    #[test]
    fn clones_share_the_counter() {
        let generation = Generation::new();
        let worker_view = generation.clone();
        generation.advance();
        generation.advance();
        assert_eq!(worker_view.current(), 2);
    }

    #[test]
    fn ensure_current_reports_both_generations() {
        let generation = Generation::new();
        assert!(generation.ensure_current("a.jpg", 0).is_ok());

        generation.advance();
        match generation.ensure_current("a.jpg", 0) {
            Err(Error::StaleGeneration {
                key,
                expected,
                current,
            }) => {
                assert_eq!(key, "a.jpg");
                assert_eq!(expected, 0);
                assert_eq!(current, 1);
            }
            other => panic!("expected a stale generation error, got {other:?}"),
        }
    }
}
