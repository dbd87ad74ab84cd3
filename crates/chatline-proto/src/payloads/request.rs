//! Client-to-server request frames.

use serde::{Deserialize, Serialize};

use crate::{ChatId, EncodeError, SuggestionKind, UserId};

/// Body of an outbound chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Message text.
    pub text: String,
}

/// Frames the client sends on the persistent connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    /// Join an existing chat.
    JoinChat {
        /// Chat to join.
        #[serde(rename = "chatId")]
        chat_id: ChatId,
    },

    /// Leave a chat.
    LeaveChat {
        /// Chat to leave.
        #[serde(rename = "chatId")]
        chat_id: ChatId,
    },

    /// Create or find a chat among the named users (self included).
    StartChat {
        /// Participants, including the current user.
        #[serde(rename = "userIds")]
        user_ids: Vec<UserId>,
    },

    /// Append a message to a chat.
    NewMessage {
        /// Target chat.
        #[serde(rename = "chatId")]
        chat_id: ChatId,
        /// Message body.
        message: OutboundMessage,
    },

    /// Search chats by name.
    GetChatSuggestions {
        /// Search text.
        #[serde(rename = "searchString")]
        search_string: String,
    },

    /// Search users by name.
    GetUserSuggestions {
        /// Search text.
        #[serde(rename = "searchString")]
        search_string: String,
    },

    /// End the session.
    Logout,
}

impl OutboundFrame {
    /// Search request for the given directory.
    pub fn suggestion_request(kind: SuggestionKind, search_string: String) -> Self {
        match kind {
            SuggestionKind::Chat => Self::GetChatSuggestions { search_string },
            SuggestionKind::User => Self::GetUserSuggestions { search_string },
        }
    }

    /// Wire `type` of this frame.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JoinChat { .. } => "join_chat",
            Self::LeaveChat { .. } => "leave_chat",
            Self::StartChat { .. } => "start_chat",
            Self::NewMessage { .. } => "new_message",
            Self::GetChatSuggestions { .. } => "get_chat_suggestions",
            Self::GetUserSuggestions { .. } => "get_user_suggestions",
            Self::Logout => "logout",
        }
    }

    /// Serialize to the JSON text sent over the connection.
    pub fn encode(&self) -> Result<String, EncodeError> {
        serde_json::to_string(self)
            .map_err(|e| EncodeError::Json { kind: self.kind(), reason: e.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_and_leave_wire_shape() {
        let join = OutboundFrame::JoinChat { chat_id: ChatId(42) }.encode().unwrap();
        insta::assert_snapshot!(join, @r#"{"type":"join_chat","chatId":42}"#);

        let leave = OutboundFrame::LeaveChat { chat_id: ChatId(42) }.encode().unwrap();
        insta::assert_snapshot!(leave, @r#"{"type":"leave_chat","chatId":42}"#);
    }

    #[test]
    fn start_chat_wire_shape() {
        let frame =
            OutboundFrame::StartChat { user_ids: vec![UserId(7), UserId(9)] }.encode().unwrap();
        insta::assert_snapshot!(frame, @r#"{"type":"start_chat","userIds":[7,9]}"#);
    }

    #[test]
    fn new_message_wire_shape() {
        let frame = OutboundFrame::NewMessage {
            chat_id: ChatId(1),
            message: OutboundMessage { text: "hello".to_string() },
        }
        .encode()
        .unwrap();
        insta::assert_snapshot!(frame, @r#"{"type":"new_message","chatId":1,"message":{"text":"hello"}}"#);
    }

    #[test]
    fn suggestion_requests_wire_shape() {
        let chats =
            OutboundFrame::suggestion_request(SuggestionKind::Chat, "ali".to_string()).encode();
        insta::assert_snapshot!(chats.unwrap(), @r#"{"type":"get_chat_suggestions","searchString":"ali"}"#);

        let users =
            OutboundFrame::suggestion_request(SuggestionKind::User, "bo".to_string()).encode();
        insta::assert_snapshot!(users.unwrap(), @r#"{"type":"get_user_suggestions","searchString":"bo"}"#);
    }

    #[test]
    fn logout_has_only_a_type() {
        let frame = OutboundFrame::Logout.encode().unwrap();
        insta::assert_snapshot!(frame, @r#"{"type":"logout"}"#);
    }

    #[test]
    fn kind_matches_encoded_type() {
        let frames = [
            OutboundFrame::JoinChat { chat_id: ChatId(1) },
            OutboundFrame::LeaveChat { chat_id: ChatId(1) },
            OutboundFrame::StartChat { user_ids: vec![UserId(1)] },
            OutboundFrame::NewMessage {
                chat_id: ChatId(1),
                message: OutboundMessage { text: String::new() },
            },
            OutboundFrame::GetChatSuggestions { search_string: String::new() },
            OutboundFrame::GetUserSuggestions { search_string: String::new() },
            OutboundFrame::Logout,
        ];

        for frame in frames {
            let value: serde_json::Value = serde_json::from_str(&frame.encode().unwrap()).unwrap();
            assert_eq!(value["type"], frame.kind());
        }
    }
}
