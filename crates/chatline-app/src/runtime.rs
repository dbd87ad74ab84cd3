//! Generic runtime for application orchestration.
//!
//! The Runtime drives the event loop, coordinating between:
//! - [`App`]: client state machine
//! - [`Driver`]: platform-specific I/O
//! - [`Environment`]: the clock
//!
//! It executes every [`AppAction`] the App returns and feeds the result of
//! each I/O operation back in as an [`AppEvent`]. It never reconnects: when
//! the stream ends, [`Runtime::run`] returns.

use std::collections::VecDeque;

use chatline_core::{ClientConfig, ConnectionState, Credentials, Environment};

use crate::{App, AppAction, AppEvent, Driver, Intent};

/// Why [`Runtime::run`] returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The user quit, or input ended.
    Quit,
    /// The user logged out.
    LoggedOut,
    /// The login exchange was refused.
    LoginRejected {
        /// Server-provided reason.
        message: String,
    },
    /// The stream closed.
    Disconnected {
        /// Why the stream ended.
        reason: String,
    },
}

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment providing the clock
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    env: E,
    app: App<D::Instant>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver<Instant = E::Instant>,
    E: Environment,
{
    /// Create a new runtime with the given driver and environment.
    pub fn new(driver: D, env: E, config: &ClientConfig) -> Self {
        Self { driver, env, app: App::new(config) }
    }

    /// Log in and run the event loop until it ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver's input or rendering fails. Stream
    /// failures are not errors; they end the loop with
    /// [`RunOutcome::Disconnected`].
    pub async fn run(&mut self, credentials: Credentials) -> Result<RunOutcome, D::Error> {
        self.driver.render(&self.app)?;

        let mut outcome = self.dispatch(AppEvent::Intent(Intent::Login(credentials))).await?;

        while outcome.is_none() {
            let wake_at = self.app.next_deadline();
            outcome = match self.driver.next_event(wake_at).await? {
                Some(event) => self.dispatch(event).await?,
                None => Some(RunOutcome::Quit),
            };
        }

        self.driver.stop();
        Ok(outcome.unwrap_or(RunOutcome::Quit))
    }

    /// Feed one event to the App and execute the resulting actions, including
    /// any events those actions produce.
    ///
    /// Returns `Some` if the loop should end.
    async fn dispatch(&mut self, event: AppEvent) -> Result<Option<RunOutcome>, D::Error> {
        let mut events = VecDeque::from([event]);
        let mut outcome = None;

        while let Some(event) = events.pop_front() {
            match &event {
                AppEvent::LoginFailed(err) => {
                    outcome = Some(RunOutcome::LoginRejected { message: err.message.clone() });
                },
                AppEvent::StreamClosed { reason }
                    if self.app.session().state() != ConnectionState::Disconnected =>
                {
                    outcome = Some(RunOutcome::Disconnected { reason: reason.clone() });
                },
                _ => {},
            }

            let actions = self.app.handle(event, self.env.now());
            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(Some(RunOutcome::Quit)),
                    AppAction::Notify { message } => self.driver.notify(&message),
                    AppAction::Authenticate { credentials } => {
                        let event = match self.driver.authenticate(&credentials).await {
                            Ok(grant) => AppEvent::LoginSucceeded(grant),
                            Err(err) => AppEvent::LoginFailed(err),
                        };
                        events.push_back(event);
                    },
                    AppAction::OpenStream { token } => {
                        let event = match self.driver.open_stream(&token).await {
                            Ok(()) => AppEvent::StreamOpened,
                            Err(err) => AppEvent::StreamClosed { reason: err.to_string() },
                        };
                        events.push_back(event);
                    },
                    AppAction::Send(text) => {
                        if let Err(err) = self.driver.send_text(text).await {
                            tracing::warn!(%err, "send failed");
                            events.push_back(AppEvent::StreamClosed { reason: err.to_string() });
                        }
                    },
                    AppAction::CloseStream => {
                        self.driver.close_stream().await;
                        outcome = Some(RunOutcome::LoggedOut);
                    },
                }
            }
        }

        Ok(outcome)
    }

    /// Get a reference to the App.
    pub fn app(&self) -> &App<D::Instant> {
        &self.app
    }

    /// Get a reference to the Driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
