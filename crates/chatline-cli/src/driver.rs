//! Terminal driver.
//!
//! Implements [`Driver`] over stdin lines, the HTTP login endpoint and the
//! WebSocket stream. The screen is re-rendered only when its text changes.

use std::{
    io::{self, Write},
    time::Instant,
};

use chatline_app::{App, AppEvent, Driver};
use chatline_core::{AuthToken, AuthenticationError, Credentials, Grant};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use url::Url;

use crate::{
    SystemEnv,
    commands::{self, CommandError},
    render,
    transport::{self, StreamEvent, StreamHandle, TransportError},
};

/// Driver errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    /// Network transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// What woke the driver.
enum Wake {
    Deadline,
    Stream(Option<StreamEvent>),
    Input(io::Result<Option<String>>),
}

/// Line-oriented terminal driver.
pub struct CliDriver {
    env: SystemEnv,
    http: reqwest::Client,
    server: Url,
    input: Lines<BufReader<Stdin>>,
    stream: Option<StreamHandle>,
    last_screen: String,
}

impl CliDriver {
    /// Create a driver for the server at `server`.
    pub fn new(server: Url, env: SystemEnv) -> Self {
        Self {
            env,
            http: reqwest::Client::new(),
            server,
            input: BufReader::new(tokio::io::stdin()).lines(),
            stream: None,
            last_screen: String::new(),
        }
    }

    fn write_out(&self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")?;
        out.flush()
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at.into()).await,
        None => std::future::pending().await,
    }
}

async fn next_stream_event(stream: &mut Option<StreamHandle>) -> Option<StreamEvent> {
    match stream {
        Some(stream) => stream.from_server.recv().await,
        None => std::future::pending().await,
    }
}

impl Driver for CliDriver {
    type Error = CliError;
    type Instant = Instant;

    async fn next_event(
        &mut self,
        wake_at: Option<Instant>,
    ) -> Result<Option<AppEvent>, CliError> {
        loop {
            let wake = tokio::select! {
                biased;

                () = wait_until(wake_at) => Wake::Deadline,
                event = next_stream_event(&mut self.stream) => Wake::Stream(event),
                line = self.input.next_line() => Wake::Input(line),
            };

            match wake {
                Wake::Deadline => return Ok(Some(AppEvent::Tick)),
                Wake::Stream(Some(StreamEvent::Frame(raw))) => {
                    return Ok(Some(AppEvent::FrameReceived(raw)));
                },
                Wake::Stream(Some(StreamEvent::Closed(reason))) => {
                    self.stream = None;
                    return Ok(Some(AppEvent::StreamClosed { reason }));
                },
                Wake::Stream(None) => {
                    self.stream = None;
                    let reason = "connection lost".to_string();
                    return Ok(Some(AppEvent::StreamClosed { reason }));
                },
                Wake::Input(line) => {
                    let Some(line) = line? else {
                        return Ok(None);
                    };
                    match commands::parse_line(&line) {
                        Ok(Some(intent)) => return Ok(Some(AppEvent::Intent(intent))),
                        Ok(None) => {},
                        Err(CommandError::Help) => self.notify(commands::HELP),
                        Err(err) => self.notify(&err.to_string()),
                    }
                },
            }
        }
    }

    async fn authenticate(
        &mut self,
        credentials: &Credentials,
    ) -> Result<Grant, AuthenticationError> {
        tracing::info!(server = %self.server, username = %credentials.username, "logging in");
        transport::authenticate(&self.http, &self.server, credentials).await
    }

    async fn open_stream(&mut self, token: &AuthToken) -> Result<(), CliError> {
        let url = transport::stream_url(&self.server, token)?;
        tracing::debug!(host = url.host_str().unwrap_or_default(), "opening stream");

        self.stream = Some(transport::connect_stream(&url).await?);
        Ok(())
    }

    async fn send_text(&mut self, text: String) -> Result<(), CliError> {
        let stream = self.stream.as_ref().ok_or(TransportError::Closed)?;
        stream.to_server.send(text).await.map_err(|_| TransportError::Closed)?;
        Ok(())
    }

    async fn close_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.close();
        }
    }

    fn notify(&mut self, message: &str) {
        if let Err(err) = self.write_out(&format!("! {message}")) {
            tracing::warn!(%err, "failed to show notification");
        }
    }

    fn render(&mut self, app: &App<Instant>) -> Result<(), CliError> {
        let screen = render::render_app(app, &self.env.local_now());
        if screen == self.last_screen {
            return Ok(());
        }

        self.write_out(&format!("\n{screen}"))?;
        self.last_screen = screen;
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.stop();
        }
    }
}
