//! Client configuration.

use std::time::Duration;

/// Quiet period before a search query is sent.
pub const DEFAULT_SUGGESTION_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Tunables for the client state machines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// How long search input must be idle before a suggestion request is sent.
    pub suggestion_quiet_period: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { suggestion_quiet_period: DEFAULT_SUGGESTION_QUIET_PERIOD }
    }
}
