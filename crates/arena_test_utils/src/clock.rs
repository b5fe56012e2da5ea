//! Manually advanced time source.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arena_core::arena::Clock;

/// A clock that only moves when a test tells it to.
///
/// Clones share the same underlying counter, so a test can hand one
/// clone to the arena and keep another to advance time:
///
/// ```
/// use arena_core::arena::Clock;
/// use arena_test_utils::ManualClock;
///
/// let clock = ManualClock::new(0);
/// let handle = clock.clone();
/// handle.advance(500);
/// assert_eq!(clock.now_ms(), 500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock starting at the given timestamp.
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Move time forward.
    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Jump to an absolute timestamp.
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
