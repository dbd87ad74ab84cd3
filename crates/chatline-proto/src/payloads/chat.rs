//! Chat, message and user directory payloads.
//!
//! Field names follow the server's wire format. Aliases accept the older
//! lowercase spellings (`chatid`, `userid`, `realname`, `write_time`) as well
//! as the camelCase ones, since both have been emitted by deployed servers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{ChatId, UserId};

/// A chat as reported in a refresh.
///
/// The payload is authoritative for this chat: membership and message history
/// replace whatever the client held before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatData {
    /// Chat identifier.
    #[serde(rename = "chatId", alias = "chatid")]
    pub chat_id: ChatId,

    /// Explicit chat name. `None` means the name is derived from membership.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Members of the chat. `None` if the server did not report membership.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserId>>,

    /// Full message history in server order.
    #[serde(default)]
    pub messages: Vec<MessageData>,
}

impl ChatData {
    /// Explicit name, treating blank names as absent.
    pub fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageData {
    /// Author of the message.
    #[serde(rename = "userid", alias = "userId", alias = "authorUserId", alias = "user")]
    pub author: UserId,

    /// Server timestamp (RFC 3339).
    #[serde(rename = "write_time", alias = "writtenAt")]
    pub written_at: DateTime<Utc>,

    /// Message body. A null or missing body reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A user directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    /// User identifier.
    #[serde(rename = "userId", alias = "userid")]
    pub user_id: UserId,

    /// Login name.
    pub username: String,

    /// Real name shown to other users.
    #[serde(rename = "displayName", alias = "realname")]
    pub display_name: String,

    /// Number of live connections the user has. `None` if not reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connected: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_accepts_lowercase_and_camel_case_ids() {
        let lower: ChatData = serde_json::from_str(r#"{"chatid": 3}"#).unwrap();
        let camel: ChatData = serde_json::from_str(r#"{"chatId": 3}"#).unwrap();

        assert_eq!(lower, camel);
        assert_eq!(lower.chat_id, ChatId(3));
        assert_eq!(lower.users, None);
        assert!(lower.messages.is_empty());
    }

    #[test]
    fn blank_name_is_not_explicit() {
        let chat: ChatData = serde_json::from_str(r#"{"chatId": 1, "name": "   "}"#).unwrap();
        assert_eq!(chat.explicit_name(), None);

        let chat: ChatData = serde_json::from_str(r#"{"chatId": 1, "name": null}"#).unwrap();
        assert_eq!(chat.explicit_name(), None);

        let chat: ChatData =
            serde_json::from_str(r#"{"chatId": 1, "name": " Lunch "}"#).unwrap();
        assert_eq!(chat.explicit_name(), Some("Lunch"));
    }

    #[test]
    fn message_parses_server_timestamp() {
        let message: MessageData = serde_json::from_str(
            r#"{"userid": 7, "write_time": "2017-05-01T12:30:00.123456+00:00", "text": "hi"}"#,
        )
        .unwrap();

        assert_eq!(message.author, UserId(7));
        assert_eq!(message.text, "hi");
        assert_eq!(message.written_at.to_rfc3339(), "2017-05-01T12:30:00.123456+00:00");
    }

    #[test]
    fn message_accepts_user_key_and_null_text() {
        let message: MessageData = serde_json::from_str(
            r#"{"user": 7, "write_time": "2017-05-01T12:30:00+00:00", "text": null}"#,
        )
        .unwrap();

        assert_eq!(message.author, UserId(7));
        assert_eq!(message.text, "");

        let message: MessageData =
            serde_json::from_str(r#"{"user": 7, "write_time": "2017-05-01T12:30:00+00:00"}"#)
                .unwrap();
        assert_eq!(message.text, "");
    }

    #[test]
    fn listed_members_are_kept_apart_from_absent_ones() {
        let chat: ChatData = serde_json::from_str(r#"{"chatid": 3, "users": []}"#).unwrap();
        assert_eq!(chat.users, Some(vec![]));
    }

    #[test]
    fn user_accepts_realname() {
        let user: UserData = serde_json::from_str(
            r#"{"userid": 7, "username": "ann", "realname": "Ann", "connected": 2}"#,
        )
        .unwrap();

        assert_eq!(user.user_id, UserId(7));
        assert_eq!(user.display_name, "Ann");
        assert_eq!(user.connected, Some(2));
    }
}
