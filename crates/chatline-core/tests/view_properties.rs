//! Property-based tests for the view projection.

use chatline_core::{
    Reconciler, View,
    view::{ONLY_YOU, UNKNOWN_USER},
};
use chatline_proto::{ChatData, ChatId, UserData, UserId};
use chrono::{DateTime, Utc};
use proptest::prelude::*;

const ME: UserId = UserId(1);

fn user(id: u64) -> UserData {
    UserData {
        user_id: UserId(id),
        username: format!("user{id}"),
        display_name: format!("User {id}"),
        connected: None,
    }
}

fn chat(id: u64, users: Vec<UserId>) -> ChatData {
    ChatData { chat_id: ChatId(id), name: None, users: Some(users), messages: vec![] }
}

proptest! {
    #[test]
    fn prop_missing_peer_degrades_to_unknown_user(
        peer in 2u64..1000,
        known in prop::collection::vec(2u64..1000, 0..10),
    ) {
        prop_assume!(!known.contains(&peer));

        let mut state = Reconciler::new();
        state.set_current_user(Some(ME));
        state.on_full_refresh(
            vec![chat(5, vec![ME, UserId(peer)])],
            known.into_iter().chain([1]).map(user).collect(),
        );

        let name = View::new(&state, None).chat_display_name(ChatId(5));
        prop_assert_eq!(name.as_deref(), Some(UNKNOWN_USER));
    }

    #[test]
    fn prop_summaries_cover_every_chat_once(ids in prop::collection::btree_set(1u64..50, 0..10)) {
        let mut state = Reconciler::new();
        state.set_current_user(Some(ME));
        state.on_full_refresh(
            ids.iter().map(|id| chat(*id, vec![ME])).collect(),
            vec![],
        );

        let summaries = View::new(&state, None).ordered_summaries(&DateTime::<Utc>::UNIX_EPOCH);

        let listed: Vec<u64> = summaries.iter().map(|summary| summary.chat_id.0).collect();
        prop_assert_eq!(listed, ids.into_iter().collect::<Vec<_>>());
        prop_assert!(summaries.iter().all(|summary| summary.name == ONLY_YOU));
    }
}
