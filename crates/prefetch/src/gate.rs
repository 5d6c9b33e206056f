//! Concurrency gate bounding simultaneous decodes
//!
//! The gate tracks its capacity explicitly next to the semaphore. Changing the
//! capacity swaps in a fresh semaphore; permits of the old one stay valid
//! until their holders drop them. Replaced semaphores are kept while anyone
//! still holds or waits on them so that closing the gate reaches them too.

use lumen_config::GateConfig;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info};

/// Permission to run one decode; released on drop
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
    capacity: usize,
}

impl GatePermit {
    /// Capacity of the gate when this permit was issued
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[derive(Debug)]
struct GateState {
    capacity: usize,
    semaphore: Arc<Semaphore>,
    retired: Vec<Arc<Semaphore>>,
    closed: bool,
}

/// Bounded, resizable decode semaphore
#[derive(Debug)]
pub struct ConcurrencyGate {
    state: Mutex<GateState>,
    min_capacity: usize,
    max_capacity: usize,
    rebuilds: AtomicU64,
}

impl ConcurrencyGate {
    pub fn new(config: &GateConfig) -> Self {
        let min_capacity = config.min_capacity.max(1);
        let max_capacity = config.max_capacity.max(min_capacity);
        let capacity = config.initial_capacity.clamp(min_capacity, max_capacity);
        Self {
            state: Mutex::new(GateState {
                capacity,
                semaphore: Arc::new(Semaphore::new(capacity)),
                retired: Vec::new(),
                closed: false,
            }),
            min_capacity,
            max_capacity,
            rebuilds: AtomicU64::new(0),
        }
    }

    /// Wait for a decode slot; `None` once the gate is closed
    pub async fn acquire(&self) -> Option<GatePermit> {
        let (semaphore, capacity) = {
            let state = self.state.lock();
            (Arc::clone(&state.semaphore), state.capacity)
        };
        match semaphore.acquire_owned().await {
            Ok(permit) => Some(GatePermit {
                _permit: permit,
                capacity,
            }),
            Err(_) => {
                debug!("Concurrency gate closed while waiting");
                None
            }
        }
    }

    /// Retune the gate, returning the capacity in effect afterwards
    pub fn set_capacity(&self, requested: usize) -> usize {
        let capacity = requested.clamp(self.min_capacity, self.max_capacity);
        let mut state = self.state.lock();
        if state.closed || state.capacity == capacity {
            return state.capacity;
        }

        info!(from = state.capacity, to = capacity, "Rebuilding concurrency gate");
        state.capacity = capacity;
        let previous = std::mem::replace(&mut state.semaphore, Arc::new(Semaphore::new(capacity)));
        state.retired.retain(|semaphore| Arc::strong_count(semaphore) > 1);
        state.retired.push(previous);
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
        capacity
    }

    pub fn capacity(&self) -> usize {
        self.state.lock().capacity
    }

    /// Free slots on the current semaphore
    pub fn available(&self) -> usize {
        self.state.lock().semaphore.available_permits()
    }

    /// Number of times the semaphore was reconstructed
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }

    /// Reject all current and future waiters
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.semaphore.close();
        for semaphore in state.retired.drain(..) {
            semaphore.close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl Default for ConcurrencyGate {
    fn default() -> Self {
        Self::new(&GateConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn permits_are_bounded_and_released_on_drop() {
        let gate = ConcurrencyGate::default();
        assert_eq!(gate.capacity(), 2);

        let first = gate.acquire().await.unwrap();
        let _second = gate.acquire().await.unwrap();
        assert_eq!(gate.available(), 0);

        let blocked = tokio::time::timeout(Duration::from_millis(20), gate.acquire()).await;
        assert!(blocked.is_err());

        drop(first);
        assert_eq!(gate.available(), 1);
    }

    #[tokio::test]
    async fn resize_rebuilds_and_old_holders_finish() {
        let gate = ConcurrencyGate::default();
        let old = gate.acquire().await.unwrap();
        assert_eq!(old.capacity(), 2);

        assert_eq!(gate.set_capacity(1), 1);
        assert_eq!(gate.rebuilds(), 1);
        // The fresh semaphore is independent of the old holder
        assert_eq!(gate.available(), 1);
        let fresh = gate.acquire().await.unwrap();
        assert_eq!(fresh.capacity(), 1);
        drop(old);
        assert_eq!(gate.available(), 0);

        // Same value is not a rebuild
        assert_eq!(gate.set_capacity(1), 1);
        assert_eq!(gate.rebuilds(), 1);
    }

    #[test]
    fn capacity_is_clamped() {
        let gate = ConcurrencyGate::new(&GateConfig {
            initial_capacity: 2,
            min_capacity: 1,
            max_capacity: 3,
            ..Default::default()
        });
        assert_eq!(gate.set_capacity(10), 3);
        assert_eq!(gate.set_capacity(0), 1);
        assert_eq!(gate.rebuilds(), 2);
    }

    #[tokio::test]
    async fn close_reaches_waiters_of_a_replaced_semaphore() {
        let gate = Arc::new(ConcurrencyGate::default());
        let _first = gate.acquire().await.unwrap();
        let _second = gate.acquire().await.unwrap();

        let waiting = tokio::spawn({
            let gate = Arc::clone(&gate);
            async move { gate.acquire().await.is_none() }
        });
        tokio::task::yield_now().await;

        gate.set_capacity(1);
        gate.close();
        let rejected = tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .expect("waiter should be released by close")
            .unwrap();
        assert!(rejected);
    }

    #[tokio::test]
    async fn closed_gate_rejects_waiters() {
        let gate = ConcurrencyGate::default();
        gate.close();
        assert!(gate.is_closed());
        assert!(gate.acquire().await.is_none());
        assert_eq!(gate.set_capacity(1), 2);
    }
}
