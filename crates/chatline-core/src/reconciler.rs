//! State reconciler.
//!
//! Owns the canonical local projection: the chats the current user belongs
//! to, their message histories, the user directory and the current suggestion
//! list. Inbound protocol events and local intents each have one entry point;
//! every entry point either applies completely or leaves state untouched.
//!
//! # Precedence
//!
//! Leaving is optimistic: the chat is removed immediately and the chat id is
//! recorded as a tombstone. Any server push for a chat that is not present
//! locally is dropped, so a late refresh or message for a just-left chat never
//! resurrects it. Joining the chat again clears the tombstone so the server's
//! confirmation can materialize it. Starting a chat never touches tombstones:
//! the server answers a start with its own chat id. A refresh whose member
//! list omits the current user confirms the departure and retires the
//! tombstone.
//!
//! Joins and starts are never applied optimistically; the chat appears when
//! the server's refresh for it arrives.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chatline_proto::{
    Candidate, ChatData, ChatId, MessageData, OutboundFrame, OutboundMessage, ProtocolEvent,
    SuggestionKind, UserData, UserId,
};
use chrono::{DateTime, Utc};

use crate::error::ReconcileError;

/// A chat message as held locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Author of the message.
    pub author: UserId,
    /// Server timestamp.
    pub written_at: DateTime<Utc>,
    /// Message body.
    pub text: String,
}

impl From<MessageData> for Message {
    fn from(data: MessageData) -> Self {
        Self { author: data.author, written_at: data.written_at, text: data.text }
    }
}

/// A chat the current user is a member of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    /// Chat identifier.
    pub chat_id: ChatId,
    /// Explicit name. `None` if the name is derived from membership.
    pub name: Option<String>,
    /// Member user ids.
    pub members: BTreeSet<UserId>,
    /// Messages in receipt order.
    pub messages: Vec<Message>,
}

impl Chat {
    /// Most recently received message.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl From<ChatData> for Chat {
    fn from(data: ChatData) -> Self {
        Self {
            chat_id: data.chat_id,
            name: data.explicit_name().map(ToString::to_string),
            members: data.users.unwrap_or_default().into_iter().collect(),
            messages: data.messages.into_iter().map(Message::from).collect(),
        }
    }
}

/// A user directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// User identifier.
    pub user_id: UserId,
    /// Login name.
    pub username: String,
    /// Real name.
    pub display_name: String,
    /// Live connection count, if reported.
    pub connected: Option<u32>,
}

impl DirectoryEntry {
    /// Whether the user has a live connection. `None` if presence is unknown.
    pub fn online(&self) -> Option<bool> {
        self.connected.map(|count| count > 0)
    }
}

impl From<UserData> for DirectoryEntry {
    fn from(data: UserData) -> Self {
        Self {
            user_id: data.user_id,
            username: data.username,
            display_name: data.display_name,
            connected: data.connected,
        }
    }
}

/// What an inbound event did to local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// State changed.
    Applied,
    /// The event referred only to chats not held locally and was dropped.
    Stale,
}

/// Canonical local state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciler {
    current_user: Option<UserId>,
    chats: BTreeMap<ChatId, Chat>,
    directory: HashMap<UserId, DirectoryEntry>,
    suggestions: Vec<Candidate>,
    suggestion_kind: Option<SuggestionKind>,
    /// Locally left chats. An entry lives until a rejoin or until the server
    /// reports membership without the current user; chats the server never
    /// mentions again keep theirs for the session, like the directory.
    departed: HashSet<ChatId>,
}

impl Reconciler {
    /// Create empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The user this state belongs to.
    pub fn current_user(&self) -> Option<UserId> {
        self.current_user
    }

    /// Set the user this state belongs to.
    pub fn set_current_user(&mut self, user_id: Option<UserId>) {
        self.current_user = user_id;
    }

    /// Chats held locally, by id.
    pub fn chats(&self) -> impl Iterator<Item = &Chat> {
        self.chats.values()
    }

    /// Look up one chat.
    pub fn chat(&self, chat_id: ChatId) -> Option<&Chat> {
        self.chats.get(&chat_id)
    }

    /// Whether the chat is held locally.
    pub fn contains(&self, chat_id: ChatId) -> bool {
        self.chats.contains_key(&chat_id)
    }

    /// Number of chats held locally.
    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }

    /// Look up one directory entry.
    pub fn user(&self, user_id: UserId) -> Option<&DirectoryEntry> {
        self.directory.get(&user_id)
    }

    /// Current suggestion list, in server rank order.
    pub fn suggestions(&self) -> &[Candidate] {
        &self.suggestions
    }

    /// Which search produced the current suggestion list.
    pub fn suggestion_kind(&self) -> Option<SuggestionKind> {
        self.suggestion_kind
    }

    /// Whether the chat was left locally and not rejoined since.
    pub fn is_departed(&self, chat_id: ChatId) -> bool {
        self.departed.contains(&chat_id)
    }

    /// Forget everything, including the current user.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply one decoded inbound event.
    pub fn apply(&mut self, event: ProtocolEvent) -> Disposition {
        match event {
            ProtocolEvent::Suggestions { kind, candidates } => {
                self.on_suggestions_received(kind, candidates)
            },
            ProtocolEvent::FullRefresh { chats, users } => self.on_full_refresh(chats, users),
            ProtocolEvent::NewMessage { chat_id, message } => self.on_new_message(chat_id, message),
        }
    }

    /// Insert or replace every chat in the payload and upsert every user.
    ///
    /// Chats not in the payload are untouched. A chat is dropped instead of
    /// inserted if it was left locally, or if its member list is present and
    /// excludes the current user (in which case a local copy is removed). A
    /// chat reported without a member list keeps the members held locally.
    pub fn on_full_refresh(&mut self, chats: Vec<ChatData>, users: Vec<UserData>) -> Disposition {
        let mut applied = !users.is_empty();

        for user in users {
            self.directory.insert(user.user_id, DirectoryEntry::from(user));
        }

        for data in chats {
            let chat_id = data.chat_id;
            let listed = data.users.is_some();
            let excludes_me = match (&data.users, self.current_user) {
                (Some(users), Some(me)) => !users.contains(&me),
                _ => false,
            };

            if self.departed.contains(&chat_id) {
                if excludes_me {
                    tracing::debug!(%chat_id, "server confirmed departure");
                    self.departed.remove(&chat_id);
                } else {
                    tracing::debug!(%chat_id, "dropping refresh for departed chat");
                }
                continue;
            }

            if excludes_me {
                if self.chats.remove(&chat_id).is_some() {
                    tracing::debug!(%chat_id, "refresh no longer lists current user");
                    applied = true;
                }
                continue;
            }

            let mut chat = Chat::from(data);
            if !listed && let Some(held) = self.chats.get_mut(&chat_id) {
                chat.members = std::mem::take(&mut held.members);
            }

            self.chats.insert(chat_id, chat);
            applied = true;
        }

        if applied { Disposition::Applied } else { Disposition::Stale }
    }

    /// Append a message to a chat held locally.
    ///
    /// A message for a chat not held locally is the leave race: it is dropped,
    /// not buffered.
    pub fn on_new_message(&mut self, chat_id: ChatId, message: MessageData) -> Disposition {
        let Some(chat) = self.chats.get_mut(&chat_id) else {
            tracing::debug!(%chat_id, "dropping message for chat not held locally");
            return Disposition::Stale;
        };

        chat.messages.push(Message::from(message));
        Disposition::Applied
    }

    /// Replace the suggestion list.
    pub fn on_suggestions_received(
        &mut self,
        kind: SuggestionKind,
        candidates: Vec<Candidate>,
    ) -> Disposition {
        self.suggestion_kind = Some(kind);
        self.suggestions = candidates;
        Disposition::Applied
    }

    /// Empty the suggestion list.
    pub fn on_suggestions_cleared(&mut self) {
        self.suggestion_kind = None;
        self.suggestions.clear();
    }

    /// Validate a join and produce its frame.
    ///
    /// # Errors
    ///
    /// - `ReconcileError::AlreadyMember` if the chat is held locally
    pub fn on_local_join(&mut self, chat_id: ChatId) -> Result<OutboundFrame, ReconcileError> {
        if self.chats.contains_key(&chat_id) {
            return Err(ReconcileError::AlreadyMember { chat_id });
        }

        self.departed.remove(&chat_id);
        Ok(OutboundFrame::JoinChat { chat_id })
    }

    /// Validate a start-chat and produce its frame.
    ///
    /// Participants are de-duplicated and the current user is added; the
    /// frame lists them in ascending order.
    ///
    /// # Errors
    ///
    /// - `ReconcileError::UnknownCurrentUser` before login
    /// - `ReconcileError::NoParticipants` if nobody but the current user is
    ///   named
    /// - `ReconcileError::AlreadyMember` if a two-person chat with the one
    ///   named peer is already held locally
    pub fn on_local_start_chat(
        &self,
        participants: &[UserId],
    ) -> Result<OutboundFrame, ReconcileError> {
        let me = self.current_user.ok_or(ReconcileError::UnknownCurrentUser)?;

        let mut members: BTreeSet<UserId> = participants.iter().copied().collect();
        members.insert(me);

        if members.len() < 2 {
            return Err(ReconcileError::NoParticipants);
        }

        if members.len() == 2
            && let Some(existing) = self.chats.values().find(|chat| chat.members == members)
        {
            return Err(ReconcileError::AlreadyMember { chat_id: existing.chat_id });
        }

        Ok(OutboundFrame::StartChat { user_ids: members.into_iter().collect() })
    }

    /// Remove a chat immediately and produce the `leave_chat` frame.
    ///
    /// # Errors
    ///
    /// - `ReconcileError::NotMember` if the chat is not held locally
    pub fn on_local_leave(&mut self, chat_id: ChatId) -> Result<OutboundFrame, ReconcileError> {
        if self.chats.remove(&chat_id).is_none() {
            return Err(ReconcileError::NotMember { chat_id });
        }

        self.departed.insert(chat_id);
        Ok(OutboundFrame::LeaveChat { chat_id })
    }

    /// Validate a message and produce its frame.
    ///
    /// The message is not appended locally; the server echoes it back as
    /// `new_message`.
    ///
    /// # Errors
    ///
    /// - `ReconcileError::EmptyMessage` if the text is blank
    /// - `ReconcileError::NotMember` if the chat is not held locally
    pub fn on_local_message(
        &self,
        chat_id: ChatId,
        text: &str,
    ) -> Result<OutboundFrame, ReconcileError> {
        if text.trim().is_empty() {
            return Err(ReconcileError::EmptyMessage);
        }

        if !self.chats.contains_key(&chat_id) {
            return Err(ReconcileError::NotMember { chat_id });
        }

        Ok(OutboundFrame::NewMessage {
            chat_id,
            message: OutboundMessage { text: text.to_string() },
        })
    }
}
