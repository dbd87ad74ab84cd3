//! HTTP login and WebSocket transport.
//!
//! Provides [`authenticate`] for the credential exchange and [`StreamHandle`]
//! for the persistent connection. This is a thin layer that moves text in and
//! out; protocol logic remains in the Sans-IO [`chatline_app::App`].

use chatline_core::{AuthToken, AuthenticationError, Credentials, Grant};
use chatline_proto::UserId;
use futures::{SinkExt, StreamExt};
use reqwest::{StatusCode, header::AUTHORIZATION};
use serde::Deserialize;
use thiserror::Error;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};
use url::Url;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Server URL cannot be used.
    #[error("invalid server url: {0}")]
    Url(String),

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The stream is no longer open.
    #[error("stream closed")]
    Closed,
}

/// Successful login response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    /// Access token for the stream.
    pub token: String,
    /// Id of the authenticated user.
    #[serde(rename = "userId", alias = "userid")]
    pub user_id: UserId,
}

impl From<LoginResponse> for Grant {
    fn from(response: LoginResponse) -> Self {
        Self { token: AuthToken::new(response.token), user_id: response.user_id }
    }
}

/// Login endpoint for a server base URL.
///
/// # Errors
///
/// Returns [`TransportError::Url`] if the base cannot be joined.
pub fn login_url(server: &Url) -> Result<Url, TransportError> {
    server.join("login").map_err(|e| TransportError::Url(e.to_string()))
}

/// Stream endpoint for a server base URL, carrying the token as a query
/// parameter. `http` maps to `ws` and `https` to `wss`.
///
/// # Errors
///
/// Returns [`TransportError::Url`] for schemes other than http(s) and ws(s).
pub fn stream_url(server: &Url, token: &AuthToken) -> Result<Url, TransportError> {
    let mut url = server.join("client").map_err(|e| TransportError::Url(e.to_string()))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(TransportError::Url(format!("unsupported scheme {other}"))),
    };
    url.set_scheme(scheme)
        .map_err(|()| TransportError::Url(format!("cannot switch to {scheme}")))?;
    url.query_pairs_mut().clear().append_pair("access_token", token.as_str());

    Ok(url)
}

/// User-facing text for a rejected login: the response body if it has one,
/// else the status reason.
pub fn rejection_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("login failed").to_string()
    } else {
        body.to_string()
    }
}

/// Exchange credentials for an access token.
///
/// Sends `POST {server}/login` with an `Authorization: username:password`
/// header.
///
/// # Errors
///
/// - [`AuthenticationError`] with the HTTP status if the server refused
/// - [`AuthenticationError`] without a status if the server was unreachable
///   or answered with an unreadable body
pub async fn authenticate(
    http: &reqwest::Client,
    server: &Url,
    credentials: &Credentials,
) -> Result<Grant, AuthenticationError> {
    let url = login_url(server).map_err(|e| AuthenticationError::unreachable(e.to_string()))?;

    let response = http
        .post(url)
        .header(AUTHORIZATION, format!("{}:{}", credentials.username, credentials.password()))
        .send()
        .await
        .map_err(|e| AuthenticationError::unreachable(format!("login request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = rejection_message(status, &body);
        return Err(AuthenticationError::rejected(status.as_u16(), message));
    }

    let body: LoginResponse = response
        .json()
        .await
        .map_err(|e| AuthenticationError::unreachable(format!("invalid login response: {e}")))?;

    Ok(body.into())
}

/// Something that happened on the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text frame arrived.
    Frame(String),
    /// The stream ended; no further events follow.
    Closed(String),
}

/// Handle to an open stream.
///
/// Text is sent and received via channels; an internal task handles the
/// WebSocket I/O.
pub struct StreamHandle {
    /// Send text frames to the server.
    pub to_server: mpsc::Sender<String>,
    /// Receive stream events.
    pub from_server: mpsc::Receiver<StreamEvent>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl StreamHandle {
    /// Close gracefully. The task sends a close frame once the outbound
    /// channel drains.
    pub fn close(self) {
        drop(self.to_server);
    }

    /// Stop the connection task immediately.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Open the stream at `url`.
///
/// # Errors
///
/// Returns [`TransportError::Connection`] if the WebSocket handshake fails.
pub async fn connect_stream(url: &Url) -> Result<StreamHandle, TransportError> {
    let (socket, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| TransportError::Connection(e.to_string()))?;

    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(32);
    let (from_server_tx, from_server_rx) = mpsc::channel::<StreamEvent>(32);

    let handle = tokio::spawn(run_stream(socket, to_server_rx, from_server_tx));

    Ok(StreamHandle {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    })
}

async fn run_stream(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut outbound: mpsc::Receiver<String>,
    inbound: mpsc::Sender<StreamEvent>,
) {
    let (mut write, mut read) = socket.split();

    let reason = loop {
        tokio::select! {
            text = outbound.recv() => match text {
                Some(text) => {
                    if let Err(e) = write.send(Message::text(text)).await {
                        break format!("write failed: {e}");
                    }
                },
                None => {
                    let _ = write.send(Message::Close(None)).await;
                    break "closed by client".to_string();
                },
            },
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    if inbound.send(StreamEvent::Frame(text.to_string())).await.is_err() {
                        break "receiver dropped".to_string();
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    break frame
                        .map(|frame| frame.reason.to_string())
                        .filter(|reason| !reason.is_empty())
                        .unwrap_or_else(|| "closed by server".to_string());
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => break format!("read failed: {e}"),
                None => break "connection lost".to_string(),
            },
        }
    };

    tracing::debug!(%reason, "stream task finished");
    let _ = inbound.send(StreamEvent::Closed(reason)).await;
}
