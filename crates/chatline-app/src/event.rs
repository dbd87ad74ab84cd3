//! Application input events.
//!
//! [`AppEvent`] is the complete set of inputs that drive the [`crate::App`]
//! state machine. Events come from two sources:
//! - User intents and timer ticks.
//! - Results of I/O the runtime performed on the App's behalf.

use chatline_core::{AuthenticationError, Grant};

use crate::Intent;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// User request.
    Intent(Intent),

    /// Timer wake-up.
    Tick,

    /// Login exchange returned a token.
    LoginSucceeded(Grant),

    /// Login exchange was refused or failed.
    LoginFailed(AuthenticationError),

    /// Stream finished opening.
    StreamOpened,

    /// Stream closed or failed.
    StreamClosed {
        /// Why the stream ended.
        reason: String,
    },

    /// Raw text frame received on the stream.
    FrameReceived(String),
}

impl From<Intent> for AppEvent {
    fn from(intent: Intent) -> Self {
        Self::Intent(intent)
    }
}
