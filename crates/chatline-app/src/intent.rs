//! User intents.
//!
//! Requests raised by whatever front end is driving the client. Each maps to
//! one [`crate::App`] method.

use chatline_core::Credentials;
use chatline_proto::{ChatId, SuggestionKind, UserId};

/// A user request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Log in and open the stream.
    Login(Credentials),

    /// Join an existing chat.
    JoinChat(ChatId),

    /// Leave a chat.
    LeaveChat(ChatId),

    /// Start (or find) a chat with these users.
    StartChat(Vec<UserId>),

    /// Send a message to a chat.
    SendMessage {
        /// Target chat.
        chat_id: ChatId,
        /// Message text.
        text: String,
    },

    /// Send a message to the selected chat.
    SendToSelected {
        /// Message text.
        text: String,
    },

    /// Search input changed.
    QueryChanged {
        /// Which directory to search.
        kind: SuggestionKind,
        /// Current input.
        text: String,
    },

    /// Dismiss the suggestion list.
    ClearSuggestions,

    /// Change the selected chat.
    SelectChat(Option<ChatId>),

    /// End the session.
    Logout,

    /// Quit the application.
    Quit,
}
