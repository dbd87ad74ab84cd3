//! Virtual clock.
//!
//! Time only moves when the harness moves it, so debounce deadlines can be
//! asserted exactly.

use std::{
    ops::{Add, Sub},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use chatline_core::Environment;

/// A point in virtual time, measured from the start of the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimInstant(Duration);

impl SimInstant {
    /// The start of the simulation.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Instant `millis` milliseconds after the start.
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    /// Time since the start.
    pub fn since_start(self) -> Duration {
        self.0
    }
}

impl Add<Duration> for SimInstant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs)
    }
}

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}

/// Environment backed by a shared, manually advanced clock.
///
/// Clones share the clock.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    nanos: Arc<AtomicU64>,
}

impl SimEnv {
    /// Create a clock at [`SimInstant::ZERO`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward to `instant`. Never moves it backwards.
    pub fn advance_to(&self, instant: SimInstant) {
        let nanos = u64::try_from(instant.0.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_max(nanos, Ordering::SeqCst);
    }

    /// Move the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.advance_to(self.now() + duration);
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> SimInstant {
        SimInstant(Duration::from_nanos(self.nanos.load(Ordering::SeqCst)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_clock() {
        let env = SimEnv::new();
        let other = env.clone();

        env.advance(Duration::from_millis(250));

        assert_eq!(other.now(), SimInstant::from_millis(250));
    }

    #[test]
    fn clock_never_goes_backwards() {
        let env = SimEnv::new();
        env.advance_to(SimInstant::from_millis(500));
        env.advance_to(SimInstant::from_millis(100));

        assert_eq!(env.now(), SimInstant::from_millis(500));
        assert_eq!(env.now() - SimInstant::from_millis(200), Duration::from_millis(300));
    }
}
