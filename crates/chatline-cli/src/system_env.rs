//! Production environment using the system clocks.

use chatline_core::Environment;
use chrono::{DateTime, Local};

/// Environment backed by `std::time::Instant`.
#[derive(Debug, Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Wall-clock time in the local zone, for labelling message timestamps.
    #[allow(clippy::disallowed_methods)]
    pub fn local_now(&self) -> DateTime<Local> {
        Local::now()
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    #[allow(clippy::disallowed_methods)]
    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    #[allow(clippy::disallowed_methods)]
    fn system_env_time_advances() {
        let env = SystemEnv::new();

        let t1 = env.now();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = env.now();

        assert!(t2 > t1, "Time should advance");
    }

    #[test]
    fn local_now_is_current_wall_clock() {
        let env = SystemEnv::new();

        let first = env.local_now();
        let second = env.local_now();

        assert!(second >= first);
        assert!(first.timestamp() > 1_500_000_000);
    }
}
