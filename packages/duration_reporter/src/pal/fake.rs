//! Fake platform implementation for testing.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::pal::abstractions::Platform;

/// Internal state for the fake platform that can be shared between clones.
#[derive(Debug)]
struct FakePlatformState {
    origin: Instant,
    elapsed: Duration,
}

/// Fake implementation of the platform abstraction for testing.
///
/// The clock stands still until a test moves it forward. Multiple clones of the same
/// `FakePlatform` share the same underlying clock, so a test can keep one clone and
/// advance time while a reporter uses another.
#[derive(Clone, Debug)]
pub(crate) struct FakePlatform {
    state: Arc<Mutex<FakePlatformState>>,
}

impl FakePlatform {
    /// Creates a new fake platform whose clock stands at an arbitrary origin.
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakePlatformState {
                origin: Instant::now(),
                elapsed: Duration::ZERO,
            })),
        }
    }

    /// Moves the clock forward by `duration`.
    ///
    /// This affects all clones of this platform.
    pub(crate) fn advance(&self, duration: Duration) {
        let mut state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        state.elapsed = state
            .elapsed
            .checked_add(duration)
            .expect("fake clock overflows Duration - tests should not advance it that far");
    }
}

impl Platform for FakePlatform {
    fn now(&self) -> Instant {
        let state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        state
            .origin
            .checked_add(state.elapsed)
            .expect("fake clock overflows Instant - tests should not advance it that far")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn clock_stands_still_until_advanced() {
        let platform = FakePlatform::new();

        assert_eq!(platform.now(), platform.now());
    }

    #[test]
    fn advance_moves_clock_forward() {
        let platform = FakePlatform::new();
        let start = platform.now();

        platform.advance(Duration::from_millis(150));
        platform.advance(Duration::from_millis(100));

        assert_eq!(platform.now().duration_since(start), Duration::from_millis(250));
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::new();
        let platform2 = platform1.clone();
        let start = platform2.now();

        platform1.advance(Duration::from_millis(100));

        assert_eq!(platform2.now().duration_since(start), Duration::from_millis(100));
    }
}
