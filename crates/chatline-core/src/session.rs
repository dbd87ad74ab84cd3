//! Session state machine.
//!
//! Tracks the connection lifecycle and owns the outbound send primitive. Like
//! the rest of this crate it performs no I/O: methods return
//! [`SessionAction`]s for the driver to execute and are told about transport
//! events after the fact.
//!
//! # State Machine
//!
//! ```text
//!                    login ok              stream open
//! ┌──────────────┐ ───────────> ┌────────────┐ ──────────> ┌───────────┐
//! │ Disconnected │              │ Connecting │             │ Connected │
//! └──────────────┘ <─────────── └────────────┘             └───────────┘
//!        ↑          stream close                                 │
//!        └───────────────────────────────────────────────────────┘
//!                        stream close / logout
//! ```
//!
//! A login request in flight is tracked as a flag on `Disconnected`, not as a
//! state of its own. Nothing here reconnects on its own.

use std::fmt;

use chatline_proto::{OutboundFrame, UserId};

use crate::error::{AuthenticationError, SessionError};

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No stream. Initial state, and the state after any close.
    Disconnected,
    /// Token obtained, stream being opened.
    Connecting,
    /// Stream open.
    Connected,
}

/// Opaque access token returned by the login exchange.
///
/// `Debug` output is redacted so tokens never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the stream request.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Username and password for the login exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    password: String,
}

impl Credentials {
    /// Bundle a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// The password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Token for opening the stream.
    pub token: AuthToken,
    /// The authenticated user.
    pub user_id: UserId,
}

/// Actions returned by the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Open the persistent stream with this token.
    OpenStream {
        /// Access token.
        token: AuthToken,
    },
    /// Write this text frame to the stream.
    SendText(String),
    /// Close the stream.
    CloseStream,
}

/// Session state machine.
#[derive(Debug, Clone)]
pub struct Session {
    state: ConnectionState,
    authenticating: bool,
    token: Option<AuthToken>,
    current_user: Option<UserId>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session in [`ConnectionState::Disconnected`].
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            authenticating: false,
            token: None,
            current_user: None,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True only while the stream is open.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// True while a login request is outstanding.
    pub fn is_authenticating(&self) -> bool {
        self.authenticating
    }

    /// The authenticated user. `None` before the first successful login.
    pub fn current_user(&self) -> Option<UserId> {
        self.current_user
    }

    /// The current access token, if any.
    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// Record that a login request is being sent.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` if a login is already in flight or a
    ///   stream is open or opening
    pub fn begin_login(&mut self) -> Result<(), SessionError> {
        if self.state != ConnectionState::Disconnected || self.authenticating {
            return Err(SessionError::InvalidState { state: self.state, operation: "log in" });
        }

        self.authenticating = true;
        Ok(())
    }

    /// Login succeeded. Transitions to [`ConnectionState::Connecting`].
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` if no login was in flight
    pub fn login_succeeded(&mut self, grant: Grant) -> Result<Vec<SessionAction>, SessionError> {
        if !self.authenticating {
            return Err(SessionError::InvalidState {
                state: self.state,
                operation: "complete login",
            });
        }

        tracing::info!(user_id = %grant.user_id, "login accepted");

        self.authenticating = false;
        self.state = ConnectionState::Connecting;
        self.current_user = Some(grant.user_id);
        self.token = Some(grant.token.clone());

        Ok(vec![SessionAction::OpenStream { token: grant.token }])
    }

    /// Login was refused. The session stays disconnected.
    ///
    /// Returns the error to surface to the user.
    pub fn login_failed(&mut self, error: AuthenticationError) -> SessionError {
        tracing::info!(status = ?error.status, "login refused: {}", error.message);

        self.authenticating = false;
        self.state = ConnectionState::Disconnected;
        SessionError::Authentication(error)
    }

    /// The stream finished opening.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidState` if no stream was being opened
    pub fn stream_opened(&mut self) -> Result<(), SessionError> {
        if self.state != ConnectionState::Connecting {
            return Err(SessionError::InvalidState { state: self.state, operation: "open stream" });
        }

        tracing::info!("stream open");
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// The stream closed or failed. Returns true if it had been open or
    /// opening.
    pub fn stream_closed(&mut self, reason: &str) -> bool {
        let was_live = self.state != ConnectionState::Disconnected;
        if was_live {
            tracing::info!(reason, "stream closed");
        }

        self.state = ConnectionState::Disconnected;
        was_live
    }

    /// Fail unless the stream is open.
    ///
    /// # Errors
    ///
    /// - `SessionError::NotConnected` if the stream is not open
    pub fn ensure_connected(&self) -> Result<(), SessionError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(SessionError::NotConnected { state: self.state })
        }
    }

    /// Serialize one outbound frame for transmission.
    ///
    /// Frames are never queued: sending while not connected is an error.
    ///
    /// # Errors
    ///
    /// - `SessionError::NotConnected` if the stream is not open
    /// - `SessionError::Encode` if the frame cannot be serialized
    pub fn send(&self, frame: &OutboundFrame) -> Result<String, SessionError> {
        self.ensure_connected()?;
        let text = frame.encode()?;
        tracing::debug!(kind = frame.kind(), "sending frame");
        Ok(text)
    }

    /// End the session: send `logout`, then close the stream.
    ///
    /// The token and current user are forgotten and the session is
    /// disconnected immediately; the later close notification is a no-op.
    ///
    /// # Errors
    ///
    /// - `SessionError::NotConnected` if the stream is not open
    /// - `SessionError::Encode` if the frame cannot be serialized
    pub fn logout(&mut self) -> Result<Vec<SessionAction>, SessionError> {
        let text = self.send(&OutboundFrame::Logout)?;

        tracing::info!("logging out");
        self.state = ConnectionState::Disconnected;
        self.token = None;
        self.current_user = None;

        Ok(vec![SessionAction::SendText(text), SessionAction::CloseStream])
    }
}

#[cfg(test)]
mod tests {
    use chatline_proto::ChatId;

    use super::*;

    fn grant() -> Grant {
        Grant { token: AuthToken::new("secret-token"), user_id: UserId(9) }
    }

    fn connected() -> Session {
        let mut session = Session::new();
        session.begin_login().unwrap();
        session.login_succeeded(grant()).unwrap();
        session.stream_opened().unwrap();
        session
    }

    #[test]
    fn login_then_open_reaches_connected() {
        let mut session = Session::new();
        assert_eq!(session.state(), ConnectionState::Disconnected);

        session.begin_login().unwrap();
        assert!(session.is_authenticating());
        assert_eq!(session.state(), ConnectionState::Disconnected);

        let actions = session.login_succeeded(grant()).unwrap();
        assert_eq!(actions, vec![SessionAction::OpenStream { token: AuthToken::new("secret-token") }]);
        assert_eq!(session.state(), ConnectionState::Connecting);
        assert_eq!(session.current_user(), Some(UserId(9)));
        assert!(!session.is_connected());

        session.stream_opened().unwrap();
        assert!(session.is_connected());
    }

    #[test]
    fn refused_login_stays_disconnected_with_server_message() {
        let mut session = Session::new();
        session.begin_login().unwrap();

        let err = session.login_failed(AuthenticationError::rejected(401, "bad credentials"));

        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert!(!session.is_authenticating());
        assert_eq!(err.to_string(), "bad credentials");
        assert!(session.token().is_none());
    }

    #[test]
    fn second_login_while_in_flight_is_rejected() {
        let mut session = Session::new();
        session.begin_login().unwrap();

        assert!(matches!(session.begin_login(), Err(SessionError::InvalidState { .. })));
    }

    #[test]
    fn login_while_connected_is_rejected() {
        let mut session = connected();
        assert!(matches!(session.begin_login(), Err(SessionError::InvalidState { .. })));
    }

    #[test]
    fn unsolicited_grant_is_rejected() {
        let mut session = Session::new();
        assert!(session.login_succeeded(grant()).is_err());
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn send_requires_open_stream() {
        let frame = OutboundFrame::JoinChat { chat_id: ChatId(1) };

        let mut session = Session::new();
        assert_eq!(session.send(&frame), Err(SessionError::NotConnected {
            state: ConnectionState::Disconnected
        }));

        session.begin_login().unwrap();
        session.login_succeeded(grant()).unwrap();
        assert_eq!(session.send(&frame), Err(SessionError::NotConnected {
            state: ConnectionState::Connecting
        }));

        session.stream_opened().unwrap();
        assert_eq!(session.send(&frame).unwrap(), r#"{"type":"join_chat","chatId":1}"#);
    }

    #[test]
    fn close_disconnects_and_stops_sends() {
        let mut session = connected();

        assert!(session.stream_closed("reset by peer"));
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert!(session.send(&OutboundFrame::Logout).is_err());

        // A second close notification changes nothing.
        assert!(!session.stream_closed("again"));
    }

    #[test]
    fn close_while_connecting_disconnects() {
        let mut session = Session::new();
        session.begin_login().unwrap();
        session.login_succeeded(grant()).unwrap();

        assert!(session.stream_closed("refused"));
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert!(session.stream_opened().is_err());
    }

    #[test]
    fn logout_sends_frame_then_closes() {
        let mut session = connected();

        let actions = session.logout().unwrap();

        assert_eq!(actions, vec![
            SessionAction::SendText(r#"{"type":"logout"}"#.to_string()),
            SessionAction::CloseStream
        ]);
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert_eq!(session.current_user(), None);
        assert!(session.token().is_none());
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let token = format!("{:?}", AuthToken::new("secret-token"));
        assert!(!token.contains("secret-token"));

        let credentials = format!("{:?}", Credentials::new("ann", "hunter2"));
        assert!(credentials.contains("ann"));
        assert!(!credentials.contains("hunter2"));
    }
}
