//! View projection.
//!
//! Read-only display values derived from a [`Reconciler`]. Nothing here
//! mutates state; a [`View`] borrows the reconciler together with the chat the
//! UI has selected.

use std::{cmp::Reverse, fmt::Display};

use chatline_proto::{ChatId, UserId};
use chrono::{DateTime, TimeZone};

use crate::{
    reconciler::{Chat, Message, Reconciler},
    timestamp::format_timestamp,
};

/// Display name of a chat whose only member is the current user.
pub const ONLY_YOU: &str = "Only you";

/// Stands in for a user missing from the directory.
pub const UNKNOWN_USER: &str = "Unknown user";

/// Summary text of a chat with no messages.
pub const NO_ACTIVITY: &str = "(No activity)";

/// One row of the chat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    /// Chat identifier.
    pub chat_id: ChatId,
    /// Display name.
    pub name: String,
    /// Text of the last message, or [`NO_ACTIVITY`].
    pub last_message: String,
    /// Label of the last message's timestamp.
    pub time_label: Option<String>,
    /// Whether the chat has any messages.
    pub has_activity: bool,
    /// Whether the chat is selected.
    pub is_selected: bool,
}

/// Contents of the message pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcript<'a> {
    /// No chat selected.
    NoneSelected,
    /// Selected chat is not held locally yet (join in flight).
    Loading {
        /// The selected chat.
        chat_id: ChatId,
    },
    /// Selected chat and its messages.
    Ready {
        /// The selected chat.
        chat_id: ChatId,
        /// Its display name.
        name: String,
        /// Its messages in receipt order.
        messages: &'a [Message],
    },
}

/// Read-only projection over reconciled state.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    state: &'a Reconciler,
    selected: Option<ChatId>,
}

impl<'a> View<'a> {
    /// Project `state` with `selected` as the selected chat.
    pub fn new(state: &'a Reconciler, selected: Option<ChatId>) -> Self {
        Self { state, selected }
    }

    /// The selected chat id, whether or not it is held locally.
    pub fn selected(&self) -> Option<ChatId> {
        self.selected
    }

    /// Display name of a chat. `None` if the chat is not held locally.
    ///
    /// The explicit name if there is one. Otherwise the real names of every
    /// member except the current user, in ascending user id order, joined by
    /// `", "`; [`ONLY_YOU`] if there are no other members.
    pub fn chat_display_name(&self, chat_id: ChatId) -> Option<String> {
        self.state.chat(chat_id).map(|chat| self.name_of(chat))
    }

    /// Real name of a user, or [`UNKNOWN_USER`].
    pub fn author_name(&self, user_id: UserId) -> &'a str {
        self.state.user(user_id).map_or(UNKNOWN_USER, |entry| entry.display_name.as_str())
    }

    /// Whether the user is online. `None` if unknown.
    pub fn online(&self, user_id: UserId) -> Option<bool> {
        self.state.user(user_id).and_then(|entry| entry.online())
    }

    /// Labels of the current suggestions, in server rank order.
    pub fn suggestion_labels(&self) -> Vec<String> {
        self.state.suggestions().iter().map(|candidate| candidate.label()).collect()
    }

    /// One summary per chat held locally.
    ///
    /// Most recently active chats first, then chats with no messages; ties
    /// broken by ascending chat id. Timestamp labels are relative to `today`.
    pub fn ordered_summaries<Tz>(&self, today: &DateTime<Tz>) -> Vec<ChatSummary>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut chats: Vec<&Chat> = self.state.chats().collect();
        chats.sort_by_key(|chat| {
            (Reverse(chat.last_message().map(|message| message.written_at)), chat.chat_id)
        });

        chats
            .into_iter()
            .map(|chat| {
                let last = chat.last_message();
                ChatSummary {
                    chat_id: chat.chat_id,
                    name: self.name_of(chat),
                    last_message: last
                        .map_or_else(|| NO_ACTIVITY.to_string(), |message| message.text.clone()),
                    time_label: last.map(|message| format_timestamp(message.written_at, today)),
                    has_activity: last.is_some(),
                    is_selected: self.selected == Some(chat.chat_id),
                }
            })
            .collect()
    }

    /// Messages of the selected chat.
    pub fn selected_transcript(&self) -> Transcript<'a> {
        let Some(chat_id) = self.selected else {
            return Transcript::NoneSelected;
        };

        match self.state.chat(chat_id) {
            Some(chat) => {
                Transcript::Ready { chat_id, name: self.name_of(chat), messages: &chat.messages }
            },
            None => Transcript::Loading { chat_id },
        }
    }

    fn name_of(&self, chat: &Chat) -> String {
        if let Some(name) = &chat.name {
            return name.clone();
        }

        let me = self.state.current_user();
        let others: Vec<&str> = chat
            .members
            .iter()
            .filter(|member| Some(**member) != me)
            .map(|member| self.author_name(*member))
            .collect();

        if others.is_empty() { ONLY_YOU.to_string() } else { others.join(", ") }
    }
}

#[cfg(test)]
mod tests {
    use chatline_proto::{ChatData, MessageData, UserData};
    use chrono::{Duration, Utc};

    use super::*;

    fn at(minutes: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::minutes(minutes)
    }

    fn chat(id: u64, users: &[u64], messages: &[(u64, i64, &str)]) -> ChatData {
        ChatData {
            chat_id: ChatId(id),
            name: None,
            users: Some(users.iter().copied().map(UserId).collect()),
            messages: messages
                .iter()
                .map(|(author, minute, text)| MessageData {
                    author: UserId(*author),
                    written_at: at(*minute),
                    text: (*text).to_string(),
                })
                .collect(),
        }
    }

    fn user(id: u64, display_name: &str) -> UserData {
        UserData {
            user_id: UserId(id),
            username: display_name.to_lowercase(),
            display_name: display_name.to_string(),
            connected: Some(1),
        }
    }

    fn state(chats: Vec<ChatData>, users: Vec<UserData>) -> Reconciler {
        let mut state = Reconciler::new();
        state.set_current_user(Some(UserId(9)));
        state.on_full_refresh(chats, users);
        state
    }

    #[test]
    fn derived_name_excludes_current_user() {
        let state = state(vec![chat(1, &[7, 9], &[])], vec![user(7, "Ann"), user(9, "Me")]);
        assert_eq!(View::new(&state, None).chat_display_name(ChatId(1)).unwrap(), "Ann");
    }

    #[test]
    fn derived_name_lists_members_by_id() {
        let state = state(vec![chat(1, &[11, 9, 7], &[])], vec![user(7, "Ann"), user(11, "Bob")]);
        assert_eq!(View::new(&state, None).chat_display_name(ChatId(1)).unwrap(), "Ann, Bob");
    }

    #[test]
    fn explicit_name_wins() {
        let mut data = chat(1, &[7, 9], &[]);
        data.name = Some("Lunch".to_string());
        let state = state(vec![data], vec![user(7, "Ann")]);

        assert_eq!(View::new(&state, None).chat_display_name(ChatId(1)).unwrap(), "Lunch");
    }

    #[test]
    fn lone_member_is_only_you() {
        let state = state(vec![chat(1, &[9], &[])], vec![]);
        assert_eq!(View::new(&state, None).chat_display_name(ChatId(1)).unwrap(), ONLY_YOU);
    }

    #[test]
    fn missing_directory_entry_is_unknown_user() {
        let state = state(vec![chat(1, &[7, 9], &[])], vec![]);
        let view = View::new(&state, None);

        assert_eq!(view.chat_display_name(ChatId(1)).unwrap(), UNKNOWN_USER);
        assert_eq!(view.online(UserId(7)), None);
    }

    #[test]
    fn summaries_order_by_recent_activity() {
        let state = state(
            vec![
                chat(1, &[9], &[(9, 10, "old")]),
                chat(2, &[9], &[]),
                chat(3, &[9], &[(9, 5, "older"), (9, 20, "newest")]),
                chat(4, &[9], &[]),
            ],
            vec![],
        );

        let summaries = View::new(&state, Some(ChatId(1))).ordered_summaries(&at(30));

        let order: Vec<u64> = summaries.iter().map(|s| s.chat_id.0).collect();
        assert_eq!(order, [3, 1, 2, 4]);

        assert_eq!(summaries[0].last_message, "newest");
        assert_eq!(summaries[0].time_label.as_deref(), Some("00:20"));
        assert!(summaries[1].is_selected);
        assert!(!summaries[2].has_activity);
        assert_eq!(summaries[2].last_message, NO_ACTIVITY);
        assert_eq!(summaries[2].time_label, None);
    }

    #[test]
    fn transcript_states() {
        let state = state(vec![chat(1, &[7, 9], &[(7, 1, "hi")])], vec![user(7, "Ann")]);

        assert_eq!(View::new(&state, None).selected_transcript(), Transcript::NoneSelected);
        assert_eq!(View::new(&state, Some(ChatId(2))).selected_transcript(), Transcript::Loading {
            chat_id: ChatId(2)
        });

        let Transcript::Ready { name, messages, .. } =
            View::new(&state, Some(ChatId(1))).selected_transcript()
        else {
            panic!("expected Ready");
        };
        assert_eq!(name, "Ann");
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn presence_and_author_names() {
        let state = state(vec![], vec![user(7, "Ann")]);
        let view = View::new(&state, None);

        assert_eq!(view.author_name(UserId(7)), "Ann");
        assert_eq!(view.author_name(UserId(8)), UNKNOWN_USER);
        assert_eq!(view.online(UserId(7)), Some(true));
    }
}
