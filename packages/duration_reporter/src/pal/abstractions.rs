//! Platform abstraction trait definitions.

use std::fmt::Debug;
use std::time::Instant;

/// Provides the monotonic clock used to timestamp reports.
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Gets the current monotonic instant.
    ///
    /// Consecutive calls never go backwards.
    fn now(&self) -> Instant;
}
