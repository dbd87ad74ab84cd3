//! Chatline client core
//!
//! Pure state machines for a chatline client. Nothing in this crate performs
//! I/O or reads the clock: time is passed in as a parameter and every
//! operation returns data (frames to send, dispositions, errors) for the
//! caller to act on.
//!
//! # Components
//!
//! - [`Session`]: connection lifecycle and the outbound send primitive
//! - [`Reconciler`]: the local projection of chats, memberships, messages and
//!   the user directory
//! - [`SuggestionRequester`]: debounces search input into one query per quiet
//!   period
//! - [`View`]: read-only display values derived from the reconciler
//!
//! # Invariants
//!
//! - A chat is present locally iff the current user believes they are a
//!   member of it.
//! - Message histories only grow, except when a refresh replaces a chat
//!   wholesale.
//! - [`Session::is_connected`] is true only between a stream open and the next
//!   stream close.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod debounce;
pub mod env;
pub mod error;
pub mod reconciler;
pub mod session;
pub mod timestamp;
pub mod view;

pub use config::ClientConfig;
pub use debounce::{SuggestionQuery, SuggestionRequester};
pub use env::Environment;
pub use error::{AuthenticationError, ReconcileError, SessionError};
pub use reconciler::{Chat, DirectoryEntry, Disposition, Message, Reconciler};
pub use session::{AuthToken, ConnectionState, Credentials, Grant, Session, SessionAction};
pub use view::{ChatSummary, Transcript, View};
