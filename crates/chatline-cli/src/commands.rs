//! Slash-command parsing for the line-oriented front end.
//!
//! Lines starting with `/` are commands; anything else is a message to the
//! selected chat. A leading `//` sends a message that starts with `/`.

use chatline_app::Intent;
use chatline_proto::{ChatId, SuggestionKind, UserId};
use thiserror::Error;

/// Help text listing every command.
pub const HELP: &str = "\
/join <chat>          join a chat by id
/leave <chat>         leave a chat
/start <user>...      start a chat with the given users
/select [chat]        select a chat (no argument clears the selection)
/find [text]          search chats by name
/users [text]         search users by name
/clear                dismiss search results
/logout               log out
/quit                 exit";

/// A line that could not be turned into an intent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Command name not recognized.
    #[error("unknown command /{0} (try /help)")]
    Unknown(String),

    /// A required argument is missing.
    #[error("/{command} needs {argument}")]
    MissingArgument {
        /// Command name.
        command: &'static str,
        /// What was expected.
        argument: &'static str,
    },

    /// An id argument is not a number.
    #[error("not an id: {0}")]
    InvalidId(String),

    /// `/help` was requested.
    #[error("commands:\n{}", HELP)]
    Help,
}

/// Parse one input line.
///
/// Returns `Ok(None)` for blank lines.
///
/// # Errors
///
/// Returns [`CommandError`] for unknown commands or bad arguments. `/help` is
/// reported as [`CommandError::Help`] so the caller shows it like any other
/// notice.
pub fn parse_line(line: &str) -> Result<Option<Intent>, CommandError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let Some(command) = line.strip_prefix('/') else {
        return Ok(Some(Intent::SendToSelected { text: line.to_string() }));
    };

    if command.starts_with('/') {
        return Ok(Some(Intent::SendToSelected { text: command.to_string() }));
    }

    let (name, rest) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
    let rest = rest.trim();

    let intent = match name {
        "join" => Intent::JoinChat(required_chat("join", rest)?),
        "leave" => Intent::LeaveChat(required_chat("leave", rest)?),
        "select" => {
            if rest.is_empty() {
                Intent::SelectChat(None)
            } else {
                Intent::SelectChat(Some(parse_id(rest)?.into()))
            }
        },
        "start" => {
            let users = rest
                .split_whitespace()
                .map(|id| parse_id(id).map(UserId))
                .collect::<Result<Vec<_>, _>>()?;
            if users.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "start",
                    argument: "at least one user id",
                });
            }
            Intent::StartChat(users)
        },
        "find" => Intent::QueryChanged { kind: SuggestionKind::Chat, text: rest.to_string() },
        "users" => Intent::QueryChanged { kind: SuggestionKind::User, text: rest.to_string() },
        "clear" => Intent::ClearSuggestions,
        "logout" => Intent::Logout,
        "quit" | "exit" => Intent::Quit,
        "help" => return Err(CommandError::Help),
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(intent))
}

fn required_chat(command: &'static str, rest: &str) -> Result<ChatId, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument { command, argument: "a chat id" });
    }
    parse_id(rest).map(ChatId)
}

fn parse_id(raw: &str) -> Result<u64, CommandError> {
    raw.parse().map_err(|_| CommandError::InvalidId(raw.to_string()))
}
