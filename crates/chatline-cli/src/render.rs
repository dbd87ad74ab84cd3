//! Plain-text rendering of the view projection.

use std::{fmt::Display, ops::Add, time::Duration};

use chatline_app::App;
use chatline_core::{Transcript, timestamp::format_timestamp};
use chrono::{DateTime, TimeZone};

/// Render the whole screen as text.
///
/// Timestamps are labelled relative to `today`.
pub fn render_app<I, Tz>(app: &App<I>, today: &DateTime<Tz>) -> String
where
    I: Copy + Ord + Add<Duration, Output = I>,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let view = app.view();
    let mut lines = Vec::new();

    if let Some(status) = app.status() {
        lines.push(format!("status: {status}"));
    }

    lines.push("chats:".to_string());
    let summaries = view.ordered_summaries(today);
    if summaries.is_empty() {
        lines.push("  (none)".to_string());
    }
    for summary in summaries {
        let marker = if summary.is_selected { '>' } else { ' ' };
        let time = summary.time_label.map(|label| format!("  {label}")).unwrap_or_default();
        lines.push(format!(
            "{marker} [{}] {}{time}  {}",
            summary.chat_id, summary.name, summary.last_message
        ));
    }

    match view.selected_transcript() {
        Transcript::NoneSelected => lines.push("--- no chat selected ---".to_string()),
        Transcript::Loading { chat_id } => lines.push(format!("--- loading chat {chat_id} ---")),
        Transcript::Ready { chat_id, name, messages } => {
            lines.push(format!("--- {name} ---"));

            if let Some(chat) = app.state().chat(chat_id) {
                let me = app.state().current_user();
                let members: Vec<String> = chat
                    .members
                    .iter()
                    .filter(|member| Some(**member) != me)
                    .map(|member| match view.online(*member) {
                        Some(true) => format!("{} (online)", view.author_name(*member)),
                        _ => view.author_name(*member).to_string(),
                    })
                    .collect();
                if !members.is_empty() {
                    lines.push(format!("with: {}", members.join(", ")));
                }
            }

            for message in messages {
                lines.push(format!(
                    "{} {}: {}",
                    format_timestamp(message.written_at, today),
                    view.author_name(message.author),
                    message.text
                ));
            }
        },
    }

    let suggestions = view.suggestion_labels();
    if !suggestions.is_empty() {
        lines.push("suggestions:".to_string());
        lines.extend(suggestions.into_iter().map(|label| format!("  {label}")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chatline_app::AppEvent;
    use chatline_core::{AuthToken, ClientConfig, Grant};
    use chatline_proto::{ChatId, UserId};
    use chrono::Utc;

    use super::*;

    const REFRESH: &str = r#"{
        "type": "refresh",
        "chat_data": [
            {"chatid": 10, "users": [1, 2, 3],
             "messages": [
                {"userid": 2, "write_time": "2017-04-28T18:30:00Z", "text": "see you monday"},
                {"userid": 3, "write_time": "2017-05-01T09:05:00Z", "text": "morning"}
             ]},
            {"chatid": 11, "name": "Lunch", "users": [1, 2]}
        ],
        "user_data": [
            {"userid": 1, "username": "me", "realname": "Me", "connected": 1},
            {"userid": 2, "username": "ann", "realname": "Ann", "connected": 1},
            {"userid": 3, "username": "bob", "realname": "Bob", "connected": 0}
        ]
    }"#;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn today() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2017-05-01T12:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn connected_app() -> App<Duration> {
        let mut app = App::new(&ClientConfig::default());
        let grant = Grant { token: AuthToken::new("t"), user_id: UserId(1) };
        app.handle(AppEvent::LoginSucceeded(grant), ms(0));
        app.handle(AppEvent::StreamOpened, ms(0));
        app.handle(AppEvent::FrameReceived(REFRESH.to_string()), ms(0));
        app
    }

    #[test]
    fn renders_empty_app() {
        let app: App<Duration> = App::new(&ClientConfig::default());
        insta::assert_snapshot!(render_app(&app, &today()), @r"
        chats:
          (none)
        --- no chat selected ---
        ");
    }

    #[test]
    fn renders_chat_list_and_transcript() {
        let mut app = connected_app();
        app.select_chat(Some(ChatId(10)));

        insta::assert_snapshot!(render_app(&app, &today()), @r"
        status: Connected
        chats:
        > [10] Ann, Bob  09:05  morning
          [11] Lunch  (No activity)
        --- Ann, Bob ---
        with: Ann (online), Bob
        Apr 28 Ann: see you monday
        09:05 Bob: morning
        ");
    }

    #[test]
    fn renders_loading_chat() {
        let mut app = connected_app();
        app.select_chat(Some(ChatId(42)));

        let screen = render_app(&app, &today());
        assert!(screen.contains("--- loading chat 42 ---"));
    }

    #[test]
    fn renders_suggestions() {
        let mut app = connected_app();
        let frame = r#"{"type": "user_suggestions",
            "data": [{"userid": 4, "username": "ali", "realname": "Ali B"}]}"#;
        app.handle(AppEvent::FrameReceived(frame.to_string()), ms(0));

        let screen = render_app(&app, &today());
        assert!(screen.ends_with("suggestions:\n  ali (Ali B)"));
    }
}
