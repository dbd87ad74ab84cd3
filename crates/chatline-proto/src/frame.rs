//! Inbound frame decoding.
//!
//! Decoding happens in two passes. The first pass parses the text into a
//! generic JSON value and inspects `type`, which lets unknown kinds be told
//! apart from known kinds with bad fields. The second pass hands the value to
//! serde for the typed shape.

use serde_json::Value;

use crate::{DecodeError, ProtocolEvent, payloads::InboundFrame};

/// Decode one inbound text frame into a [`ProtocolEvent`].
///
/// # Errors
///
/// - [`DecodeError::Json`] if the text is not JSON
/// - [`DecodeError::NotAnObject`] if the JSON is not an object
/// - [`DecodeError::MissingType`] if there is no string `type` field
/// - [`DecodeError::UnknownType`] if `type` is not in [`InboundFrame::KINDS`]
/// - [`DecodeError::Malformed`] if the fields do not match the known shape
pub fn decode(raw: &str) -> Result<ProtocolEvent, DecodeError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| DecodeError::Json(e.to_string()))?;

    let kind = match &value {
        Value::Object(object) => match object.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            _ => return Err(DecodeError::MissingType),
        },
        _ => return Err(DecodeError::NotAnObject),
    };

    if !InboundFrame::KINDS.contains(&kind.as_str()) {
        return Err(DecodeError::UnknownType { kind });
    }

    let frame: InboundFrame = serde_json::from_value(value)
        .map_err(|e| DecodeError::Malformed { kind, reason: e.to_string() })?;

    Ok(frame.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Candidate, ChatId, SuggestionKind, UserId};

    #[test]
    fn decodes_refresh_with_lowercase_field_names() {
        let raw = r#"{
            "type": "refresh",
            "chat_data": [{
                "chatid": 1,
                "name": null,
                "users": [7, 9],
                "messages": [
                    {"userid": 7, "write_time": "2017-05-01T09:00:00+00:00", "text": "hi"}
                ]
            }],
            "user_data": [{"userid": 7, "username": "ann", "realname": "Ann"}]
        }"#;

        let ProtocolEvent::FullRefresh { chats, users } = decode(raw).unwrap() else {
            panic!("expected FullRefresh");
        };

        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].chat_id, ChatId(1));
        assert_eq!(chats[0].users, Some(vec![UserId(7), UserId(9)]));
        assert_eq!(chats[0].messages[0].text, "hi");
        assert_eq!(users[0].display_name, "Ann");
    }

    #[test]
    fn refresh_without_user_data_is_accepted() {
        let raw = r#"{"type": "refresh", "chat_data": []}"#;
        assert_eq!(decode(raw).unwrap(), ProtocolEvent::FullRefresh {
            chats: vec![],
            users: vec![]
        });
    }

    #[test]
    fn data_update_is_a_full_refresh() {
        let raw = r#"{"type": "data_update", "chat_data": [{"chatId": 4, "users": []}]}"#;
        let event = decode(raw).unwrap();
        assert_eq!(event.name(), "full_refresh");
    }

    #[test]
    fn decodes_server_refresh_without_membership() {
        let raw = r#"{"type": "refresh", "chat_data": [{
            "chatid": 42,
            "name": "Lunch",
            "messages": [{"user": 7, "write_time": "2017-05-01T09:00:00+00:00", "text": null}]
        }]}"#;

        let ProtocolEvent::FullRefresh { chats, .. } = decode(raw).unwrap() else {
            panic!("expected FullRefresh");
        };
        assert_eq!(chats[0].users, None);
        assert_eq!(chats[0].messages[0].author, UserId(7));
        assert_eq!(chats[0].messages[0].text, "");
    }

    #[test]
    fn decodes_new_message() {
        let raw = r#"{
            "type": "new_message",
            "chatid": 42,
            "data": {"userid": 3, "write_time": "2017-05-01T09:00:00Z", "text": "late"}
        }"#;

        let ProtocolEvent::NewMessage { chat_id, message } = decode(raw).unwrap() else {
            panic!("expected NewMessage");
        };
        assert_eq!(chat_id, ChatId(42));
        assert_eq!(message.author, UserId(3));
    }

    #[test]
    fn decodes_both_suggestion_kinds() {
        let chats = r#"{"type": "chat_suggestions", "data": [{"chatid": 5, "name": "alice fans"}]}"#;
        let ProtocolEvent::Suggestions { kind, candidates } = decode(chats).unwrap() else {
            panic!("expected Suggestions");
        };
        assert_eq!(kind, SuggestionKind::Chat);
        assert!(matches!(&candidates[..], [Candidate::Chat(c)] if c.chat_id == ChatId(5)));

        let users = r#"{"type": "user_suggestions",
            "data": [{"userid": 8, "username": "ali", "realname": "Ali B"}]}"#;
        let ProtocolEvent::Suggestions { kind, candidates } = decode(users).unwrap() else {
            panic!("expected Suggestions");
        };
        assert_eq!(kind, SuggestionKind::User);
        assert!(matches!(&candidates[..], [Candidate::User(u)] if u.username == "ali"));
    }

    #[test]
    fn unknown_type_is_reported_by_name() {
        let result = decode(r#"{"type": "user_connected", "userid": 3}"#);
        assert_eq!(result, Err(DecodeError::UnknownType { kind: "user_connected".to_string() }));
    }

    #[test]
    fn known_type_with_bad_fields_is_malformed() {
        let result = decode(r#"{"type": "new_message", "chatid": "forty-two"}"#);
        assert!(matches!(result, Err(DecodeError::Malformed { ref kind, .. }) if kind == "new_message"));
    }

    #[test]
    fn one_bad_chat_rejects_the_whole_refresh() {
        let raw = r#"{"type": "refresh", "chat_data": [
            {"chatid": 1, "users": [1]},
            {"chatid": 2, "users": ["not-an-id"]}
        ]}"#;
        assert!(matches!(decode(raw), Err(DecodeError::Malformed { .. })));
    }

    #[test]
    fn non_objects_and_untyped_frames_are_rejected() {
        assert!(matches!(decode("logout"), Err(DecodeError::Json(_))));
        assert_eq!(decode("[1, 2]"), Err(DecodeError::NotAnObject));
        assert_eq!(decode(r#"{"data": []}"#), Err(DecodeError::MissingType));
        assert_eq!(decode(r#"{"type": 7}"#), Err(DecodeError::MissingType));
    }
}
