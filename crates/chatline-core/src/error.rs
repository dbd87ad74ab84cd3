//! Error types for the client core.
//!
//! Two layers: [`SessionError`] for connection lifecycle and sending, and
//! [`ReconcileError`] for local intents the reconciler refuses. Both are
//! recoverable; none of them close the session.

use chatline_proto::{ChatId, EncodeError};
use thiserror::Error;

use crate::session::ConnectionState;

/// The login exchange was refused or could not be completed.
///
/// Displays as the server-provided message, unchanged, so it can be shown to
/// the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthenticationError {
    /// HTTP status of the refusal. `None` if no response was received.
    pub status: Option<u16>,
    /// Human-readable reason.
    pub message: String,
}

impl AuthenticationError {
    /// Refusal carrying the server's status and message.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self { status: Some(status), message: message.into() }
    }

    /// Failure before any response arrived.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self { status: None, message: message.into() }
    }
}

/// Errors from the session state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Credentials were not accepted.
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    /// A frame was sent while the stream is not open.
    #[error("not connected (state: {state:?})")]
    NotConnected {
        /// State at the time of the send.
        state: ConnectionState,
    },

    /// Operation is not valid in the current state.
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// State when the operation was attempted.
        state: ConnectionState,
        /// Operation that was attempted.
        operation: &'static str,
    },

    /// Outbound frame could not be serialized.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl SessionError {
    /// Returns true if the error should be shown to the user.
    ///
    /// Encoding failures are internal faults and only logged.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Encode(_))
    }
}

/// Local intents the reconciler refuses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// The chat is already present locally.
    #[error("already a member of chat {chat_id}")]
    AlreadyMember {
        /// The chat in question.
        chat_id: ChatId,
    },

    /// The chat is not present locally.
    #[error("not a member of chat {chat_id}")]
    NotMember {
        /// The chat in question.
        chat_id: ChatId,
    },

    /// Starting a chat needs the current user's id, which arrives with login.
    #[error("current user is not known yet")]
    UnknownCurrentUser,

    /// Starting a chat needs at least one other participant.
    #[error("no participants given")]
    NoParticipants,

    /// Message text is empty or whitespace.
    #[error("message is empty")]
    EmptyMessage,
}

impl ReconcileError {
    /// Returns true if the error should be shown to the user.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::UnknownCurrentUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_error_displays_server_message_verbatim() {
        let err = AuthenticationError::rejected(401, "bad credentials");
        assert_eq!(err.to_string(), "bad credentials");

        let wrapped = SessionError::from(err);
        assert_eq!(wrapped.to_string(), "bad credentials");
        assert!(wrapped.is_user_facing());
    }

    #[test]
    fn encode_errors_are_internal() {
        let err = SessionError::Encode(EncodeError::Json {
            kind: "logout",
            reason: "boom".to_string(),
        });
        assert!(!err.is_user_facing());
    }

    #[test]
    fn reconcile_errors_name_the_chat() {
        let err = ReconcileError::AlreadyMember { chat_id: ChatId(42) };
        assert_eq!(err.to_string(), "already a member of chat 42");
        assert!(err.is_user_facing());
        assert!(!ReconcileError::UnknownCurrentUser.is_user_facing());
    }
}
