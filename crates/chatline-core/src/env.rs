//! Environment abstraction for deterministic testing.
//!
//! The only resource the client logic needs from its environment is a
//! monotonic clock. Production uses `std::time::Instant`; tests and the
//! simulation harness use a manually advanced virtual clock.

use std::{
    ops::{Add, Sub},
    time::Duration,
};

/// Abstract environment providing time.
pub trait Environment: Clone + Send + Sync + 'static {
    /// The instant type used by this environment.
    ///
    /// Must support adding a [`Duration`] so deadlines can be computed.
    type Instant: Copy
        + Ord
        + Send
        + Sync
        + std::fmt::Debug
        + Add<Duration, Output = Self::Instant>
        + Sub<Output = Duration>;

    /// Current time (monotonic).
    ///
    /// # Invariants
    ///
    /// - Subsequent calls return times >= previous calls.
    fn now(&self) -> Self::Instant;
}
