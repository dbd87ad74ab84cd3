//! Search suggestion payloads.

use serde::{Deserialize, Serialize};

use crate::{ChatId, UserId};

/// Which directory a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    /// Search chats by name.
    Chat,
    /// Search users by name.
    User,
}

/// A chat returned by a chat search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCandidate {
    /// Chat identifier.
    #[serde(rename = "chatId", alias = "chatid")]
    pub chat_id: ChatId,

    /// Chat name, if it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A user returned by a user search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCandidate {
    /// User identifier.
    #[serde(rename = "userId", alias = "userid")]
    pub user_id: UserId,

    /// Login name.
    pub username: String,

    /// Real name.
    #[serde(rename = "displayName", alias = "realname")]
    pub display_name: String,
}

/// One entry of a suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// A chat the user could join.
    Chat(ChatCandidate),
    /// A user the current user could start a chat with.
    User(UserCandidate),
}

impl Candidate {
    /// Label shown in a suggestion dropdown.
    pub fn label(&self) -> String {
        match self {
            Self::Chat(chat) => match chat.name.as_deref() {
                Some(name) if !name.trim().is_empty() => name.to_string(),
                _ => format!("Chat {}", chat.chat_id),
            },
            Self::User(user) => format!("{} ({})", user.username, user.display_name),
        }
    }
}
