//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` plays a script of timed events against the production
//! [`chatline_app::Runtime`]. Time advances on the shared [`SimEnv`] clock
//! only when the driver jumps to the next scripted event or to the App's
//! timer deadline, whichever comes first.
//!
//! Everything the runtime asks the driver to do is recorded for assertions:
//! sent frames (with the virtual time they were sent), notifications and
//! renders.

use std::collections::VecDeque;

use chatline_app::{App, AppEvent, Driver, Intent};
use chatline_core::{AuthToken, AuthenticationError, Credentials, Environment, Grant};
use chatline_proto::UserId;

use crate::sim_env::{SimEnv, SimInstant};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Scripted driver for deterministic runtime tests.
pub struct SimDriver {
    env: SimEnv,
    script: VecDeque<(SimInstant, AppEvent)>,
    login: Result<Grant, AuthenticationError>,
    open_failure: Option<String>,
    replies: Vec<(String, String)>,
    stream_open: bool,
    sent: Vec<(SimInstant, String)>,
    notifications: Vec<String>,
    renders: usize,
}

impl SimDriver {
    /// Create a driver whose logins succeed as user 1.
    pub fn new(env: SimEnv) -> Self {
        Self {
            env,
            script: VecDeque::new(),
            login: Ok(Grant { token: AuthToken::new("sim-token"), user_id: UserId(1) }),
            open_failure: None,
            replies: Vec::new(),
            stream_open: false,
            sent: Vec::new(),
            notifications: Vec::new(),
            renders: 0,
        }
    }

    /// Log in as `user_id`.
    #[must_use]
    pub fn logged_in_as(mut self, user_id: UserId) -> Self {
        self.login = Ok(Grant { token: AuthToken::new("sim-token"), user_id });
        self
    }

    /// Refuse the login with this status and message.
    #[must_use]
    pub fn rejecting_login(mut self, status: u16, message: &str) -> Self {
        self.login = Err(AuthenticationError::rejected(status, message));
        self
    }

    /// Fail to open the stream.
    #[must_use]
    pub fn failing_open(mut self, reason: &str) -> Self {
        self.open_failure = Some(reason.to_string());
        self
    }

    /// Whenever a frame of type `kind` is sent, deliver `reply` as an inbound
    /// frame at the same instant.
    #[must_use]
    pub fn replying(mut self, kind: &str, reply: &str) -> Self {
        self.replies.push((format!(r#""type":"{kind}""#), reply.to_string()));
        self
    }

    /// Schedule an event at `at`.
    ///
    /// Events must be scheduled in time order.
    pub fn at(&mut self, at: SimInstant, event: AppEvent) -> &mut Self {
        self.script.push_back((at, event));
        self
    }

    /// Schedule an intent at `at`.
    pub fn intent_at(&mut self, at: SimInstant, intent: Intent) -> &mut Self {
        self.at(at, AppEvent::Intent(intent))
    }

    /// Schedule an inbound frame at `at`.
    pub fn frame_at(&mut self, at: SimInstant, raw: &str) -> &mut Self {
        self.at(at, AppEvent::FrameReceived(raw.to_string()))
    }

    /// Frames sent so far, with the instant each was sent.
    pub fn sent(&self) -> &[(SimInstant, String)] {
        &self.sent
    }

    /// Sent frames whose type is `kind`.
    pub fn sent_of_kind(&self, kind: &str) -> Vec<&(SimInstant, String)> {
        let needle = format!(r#""type":"{kind}""#);
        self.sent.iter().filter(|(_, text)| text.contains(&needle)).collect()
    }

    /// Notifications shown so far.
    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Number of renders so far.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Whether the stream is open.
    pub fn is_stream_open(&self) -> bool {
        self.stream_open
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = SimInstant;

    async fn next_event(
        &mut self,
        wake_at: Option<SimInstant>,
    ) -> Result<Option<AppEvent>, Self::Error> {
        let scripted_at = self.script.front().map(|(at, _)| *at);

        match (scripted_at, wake_at) {
            (Some(at), Some(wake)) if wake < at => {
                self.env.advance_to(wake);
                Ok(Some(AppEvent::Tick))
            },
            (None, Some(wake)) => {
                self.env.advance_to(wake);
                Ok(Some(AppEvent::Tick))
            },
            _ => Ok(self.script.pop_front().map(|(at, event)| {
                self.env.advance_to(at);
                event
            })),
        }
    }

    async fn authenticate(&mut self, credentials: &Credentials) -> Result<Grant, AuthenticationError> {
        tracing::debug!(username = %credentials.username, "sim login");
        self.login.clone()
    }

    async fn open_stream(&mut self, _token: &AuthToken) -> Result<(), Self::Error> {
        if let Some(reason) = &self.open_failure {
            return Err(SimDriverError(reason.clone()));
        }
        self.stream_open = true;
        Ok(())
    }

    async fn send_text(&mut self, text: String) -> Result<(), Self::Error> {
        if !self.stream_open {
            return Err(SimDriverError("stream closed".to_string()));
        }

        let now = self.env.now();
        let replies: Vec<AppEvent> = self
            .replies
            .iter()
            .filter(|(needle, _)| text.contains(needle.as_str()))
            .map(|(_, reply)| AppEvent::FrameReceived(reply.clone()))
            .collect();
        for reply in replies.into_iter().rev() {
            self.script.push_front((now, reply));
        }

        self.sent.push((now, text));
        Ok(())
    }

    async fn close_stream(&mut self) {
        self.stream_open = false;
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }

    fn render(&mut self, _app: &App<SimInstant>) -> Result<(), Self::Error> {
        self.renders += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.stream_open = false;
    }
}
