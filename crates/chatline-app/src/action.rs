//! Application side-effects.
//!
//! [`AppAction`]s are instructions produced by the [`crate::App`] state
//! machine for the runtime to execute.

use chatline_core::{AuthToken, Credentials, SessionAction};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the view.
    Render,

    /// Quit the application.
    Quit,

    /// Run the login exchange.
    Authenticate {
        /// Credentials to present.
        credentials: Credentials,
    },

    /// Open the persistent stream.
    OpenStream {
        /// Access token from the login exchange.
        token: AuthToken,
    },

    /// Write one text frame to the stream.
    Send(String),

    /// Close the stream.
    CloseStream,

    /// Show a one-off message to the user.
    Notify {
        /// Message text.
        message: String,
    },
}

impl From<SessionAction> for AppAction {
    fn from(action: SessionAction) -> Self {
        match action {
            SessionAction::OpenStream { token } => Self::OpenStream { token },
            SessionAction::SendText(text) => Self::Send(text),
            SessionAction::CloseStream => Self::CloseStream,
        }
    }
}
