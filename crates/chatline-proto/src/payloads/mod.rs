//! JSON-encoded protocol messages.
//!
//! Inbound frames are parsed into [`InboundFrame`] (the raw wire shape) and
//! then collapsed into [`ProtocolEvent`], the closed set of events the rest of
//! the client reasons about. `refresh` and `data_update` share one event, as do
//! the two suggestion kinds.
//!
//! # Invariants
//!
//! Every `type` listed in [`InboundFrame::KINDS`] maps to exactly one
//! [`InboundFrame`] variant (enforced by the `known_kinds_cover_every_variant`
//! test).

pub mod chat;
pub mod request;
pub mod suggestion;

pub use chat::{ChatData, MessageData, UserData};
pub use request::{OutboundFrame, OutboundMessage};
use serde::{Deserialize, Serialize};
pub use suggestion::{Candidate, ChatCandidate, SuggestionKind, UserCandidate};

use crate::ChatId;

/// Body shared by `refresh` and `data_update` frames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshPayload {
    /// Chats being reported.
    #[serde(default)]
    pub chat_data: Vec<ChatData>,
    /// Directory entries being reported.
    #[serde(default)]
    pub user_data: Vec<UserData>,
}

/// Server-to-client frames, in wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    /// Result of a chat search.
    ChatSuggestions {
        /// Matching chats.
        #[serde(default)]
        data: Vec<ChatCandidate>,
    },

    /// Result of a user search.
    UserSuggestions {
        /// Matching users.
        #[serde(default)]
        data: Vec<UserCandidate>,
    },

    /// Cumulative chat/user upsert.
    Refresh(RefreshPayload),

    /// Cumulative chat/user upsert (newer servers).
    DataUpdate(RefreshPayload),

    /// A message appended to one chat.
    NewMessage {
        /// Chat the message belongs to.
        #[serde(rename = "chatId", alias = "chatid")]
        chat_id: ChatId,
        /// The message.
        data: MessageData,
    },
}

impl InboundFrame {
    /// Every `type` value this client understands.
    pub const KINDS: [&'static str; 5] =
        ["chat_suggestions", "user_suggestions", "refresh", "data_update", "new_message"];
}

/// Typed event decoded from an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolEvent {
    /// A search completed; replaces the suggestion list.
    Suggestions {
        /// Which search produced the list.
        kind: SuggestionKind,
        /// Candidates in server rank order.
        candidates: Vec<Candidate>,
    },

    /// Cumulative upsert of chats and directory entries.
    FullRefresh {
        /// Chats to insert or replace wholesale.
        chats: Vec<ChatData>,
        /// Directory entries to insert or overwrite.
        users: Vec<UserData>,
    },

    /// One message appended to one chat.
    NewMessage {
        /// Chat the message belongs to.
        chat_id: ChatId,
        /// The message.
        message: MessageData,
    },
}

impl ProtocolEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Suggestions { .. } => "suggestions",
            Self::FullRefresh { .. } => "full_refresh",
            Self::NewMessage { .. } => "new_message",
        }
    }
}

impl From<InboundFrame> for ProtocolEvent {
    fn from(frame: InboundFrame) -> Self {
        match frame {
            InboundFrame::ChatSuggestions { data } => Self::Suggestions {
                kind: SuggestionKind::Chat,
                candidates: data.into_iter().map(Candidate::Chat).collect(),
            },
            InboundFrame::UserSuggestions { data } => Self::Suggestions {
                kind: SuggestionKind::User,
                candidates: data.into_iter().map(Candidate::User).collect(),
            },
            InboundFrame::Refresh(payload) | InboundFrame::DataUpdate(payload) => {
                Self::FullRefresh { chats: payload.chat_data, users: payload.user_data }
            },
            InboundFrame::NewMessage { chat_id, data } => {
                Self::NewMessage { chat_id, message: data }
            },
        }
    }
}
