//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the runtime from specific I/O
//! implementations. Each front end implements it to provide platform I/O,
//! while the generic [`crate::Runtime`] handles all orchestration.

use std::{
    future::Future,
    ops::{Add, Sub},
    time::Duration,
};

use chatline_core::{AuthToken, AuthenticationError, Credentials, Grant};

use crate::{App, AppEvent};

/// Abstracts I/O operations for the application runtime.
///
/// # Implementations
///
/// - **CLI**: stdin lines, reqwest login, tokio-tungstenite stream
/// - **Tests**: scripted events and a virtual clock
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in tests.
    type Instant: Copy
        + Ord
        + Send
        + Sync
        + Add<Duration, Output = Self::Instant>
        + Sub<Output = Duration>;

    /// Wait for the next input event.
    ///
    /// Must return [`AppEvent::Tick`] no later than `wake_at` if nothing else
    /// happens first. Returns `None` when input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the input source fails.
    fn next_event(
        &mut self,
        wake_at: Option<Self::Instant>,
    ) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Exchange credentials for an access token.
    fn authenticate(
        &mut self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Grant, AuthenticationError>> + Send;

    /// Open the persistent stream.
    ///
    /// Inbound frames are reported through [`Driver::next_event`] as
    /// [`AppEvent::FrameReceived`], and the end of the stream as
    /// [`AppEvent::StreamClosed`].
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be opened.
    fn open_stream(
        &mut self,
        token: &AuthToken,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Write one text frame to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is closed or the write fails.
    fn send_text(&mut self, text: String) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Close the stream.
    fn close_stream(&mut self) -> impl Future<Output = ()> + Send;

    /// Show a one-off message to the user.
    fn notify(&mut self, message: &str);

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App<Self::Instant>) -> Result<(), Self::Error>;

    /// Release resources.
    fn stop(&mut self);
}
