//! Application state machine.
//!
//! [`App`] ties the client core together: the session, the reconciler, the
//! suggestion debouncer and the UI selection. It consumes [`AppEvent`]s and
//! produces [`AppAction`]s for the runtime to execute; it performs no I/O.
//!
//! Intents check the session before touching local state, so a refused
//! intent leaves everything as it was. Inbound frames are decoded here and
//! handed to the reconciler in arrival order; frames that fail to decode are
//! logged and dropped.

use std::{ops::Add, time::Duration};

use chatline_core::{ClientConfig, Credentials, Reconciler, Session, SuggestionRequester, View};
use chatline_proto::{ChatId, SuggestionKind, UserId};

use crate::{AppAction, AppError, AppEvent, Intent};

/// Client state machine.
///
/// Generic over the instant type so tests can drive the debounce timer with
/// virtual time.
#[derive(Debug, Clone)]
pub struct App<I> {
    session: Session,
    state: Reconciler,
    requester: SuggestionRequester<I>,
    /// Selected chat. May name a chat not held yet (join in flight).
    selected: Option<ChatId>,
    /// Transient status line. `None` if nothing to show.
    status_message: Option<String>,
}

impl<I> App<I>
where
    I: Copy + Ord + Add<Duration, Output = I>,
{
    /// Create a disconnected App.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            session: Session::new(),
            state: Reconciler::new(),
            requester: SuggestionRequester::new(config.suggestion_quiet_period),
            selected: None,
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent, now: I) -> Vec<AppAction> {
        match event {
            AppEvent::Intent(intent) => match self.apply_intent(intent, now) {
                Ok(actions) => actions,
                Err(err) => self.report(&err),
            },
            AppEvent::Tick => self.tick(now),
            AppEvent::LoginSucceeded(grant) => {
                let user_id = grant.user_id;
                match self.session.login_succeeded(grant) {
                    Ok(actions) => {
                        self.state.reset();
                        self.state.set_current_user(Some(user_id));
                        self.selected = None;
                        self.status_message = Some("Connecting...".to_string());

                        let mut actions: Vec<AppAction> =
                            actions.into_iter().map(AppAction::from).collect();
                        actions.push(AppAction::Render);
                        actions
                    },
                    Err(err) => {
                        tracing::warn!(%err, "ignoring unexpected login result");
                        vec![]
                    },
                }
            },
            AppEvent::LoginFailed(error) => {
                let err = self.session.login_failed(error);
                self.report(&AppError::from(err))
            },
            AppEvent::StreamOpened => match self.session.stream_opened() {
                Ok(()) => {
                    self.status_message = Some("Connected".to_string());
                    vec![AppAction::Render]
                },
                Err(err) => {
                    tracing::warn!(%err, "ignoring unexpected stream open");
                    vec![]
                },
            },
            AppEvent::StreamClosed { reason } => {
                if !self.session.stream_closed(&reason) {
                    return vec![];
                }
                self.requester.cancel();
                self.status_message = Some(format!("Disconnected: {reason}"));
                vec![AppAction::Render]
            },
            AppEvent::FrameReceived(raw) => self.receive(&raw),
        }
    }

    fn apply_intent(&mut self, intent: Intent, now: I) -> Result<Vec<AppAction>, AppError> {
        match intent {
            Intent::Login(credentials) => self.login(credentials),
            Intent::JoinChat(chat_id) => self.join_chat(chat_id),
            Intent::LeaveChat(chat_id) => self.leave_chat(chat_id),
            Intent::StartChat(participants) => self.start_chat(&participants),
            Intent::SendMessage { chat_id, text } => self.send_message(chat_id, &text),
            Intent::SendToSelected { text } => self.send_to_selected(&text),
            Intent::QueryChanged { kind, text } => self.query_changed(kind, &text, now),
            Intent::ClearSuggestions => Ok(self.clear_suggestions()),
            Intent::SelectChat(chat_id) => Ok(self.select_chat(chat_id)),
            Intent::Logout => self.logout(),
            Intent::Quit => Ok(vec![AppAction::Quit]),
        }
    }

    /// Surface a refused intent. Internal faults are only logged.
    fn report(&mut self, err: &AppError) -> Vec<AppAction> {
        if !err.is_user_facing() {
            tracing::warn!(%err, "intent failed");
            return vec![];
        }

        let message = err.to_string();
        self.status_message = Some(message.clone());
        vec![AppAction::Notify { message }, AppAction::Render]
    }

    fn receive(&mut self, raw: &str) -> Vec<AppAction> {
        let event = match chatline_proto::decode(raw) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(kind = err.kind(), %err, "dropping inbound frame");
                return vec![];
            },
        };

        tracing::debug!(event = event.name(), "inbound event");
        match self.state.apply(event) {
            chatline_core::Disposition::Applied => vec![AppAction::Render],
            chatline_core::Disposition::Stale => vec![],
        }
    }

    /// Start the login exchange.
    pub fn login(&mut self, credentials: Credentials) -> Result<Vec<AppAction>, AppError> {
        self.session.begin_login()?;
        self.status_message = Some(format!("Logging in as {}...", credentials.username));
        Ok(vec![AppAction::Authenticate { credentials }, AppAction::Render])
    }

    /// Join a chat and select it.
    ///
    /// The chat shows as loading until the server's refresh arrives.
    pub fn join_chat(&mut self, chat_id: ChatId) -> Result<Vec<AppAction>, AppError> {
        self.session.ensure_connected()?;
        let frame = self.state.on_local_join(chat_id)?;
        let text = self.session.send(&frame)?;

        self.selected = Some(chat_id);
        Ok(vec![AppAction::Send(text), AppAction::Render])
    }

    /// Leave a chat. It disappears locally at once.
    pub fn leave_chat(&mut self, chat_id: ChatId) -> Result<Vec<AppAction>, AppError> {
        self.session.ensure_connected()?;
        let frame = self.state.on_local_leave(chat_id)?;
        let text = self.session.send(&frame)?;

        if self.selected == Some(chat_id) {
            self.selected = None;
        }
        Ok(vec![AppAction::Send(text), AppAction::Render])
    }

    /// Start a chat with the given users.
    pub fn start_chat(&mut self, participants: &[UserId]) -> Result<Vec<AppAction>, AppError> {
        self.session.ensure_connected()?;
        let frame = self.state.on_local_start_chat(participants)?;
        let text = self.session.send(&frame)?;

        self.status_message = Some("Starting chat...".to_string());
        Ok(vec![AppAction::Send(text), AppAction::Render])
    }

    /// Send a message to a chat.
    pub fn send_message(
        &mut self,
        chat_id: ChatId,
        text: &str,
    ) -> Result<Vec<AppAction>, AppError> {
        self.session.ensure_connected()?;
        let frame = self.state.on_local_message(chat_id, text)?;
        Ok(vec![AppAction::Send(self.session.send(&frame)?)])
    }

    /// Send a message to the selected chat.
    pub fn send_to_selected(&mut self, text: &str) -> Result<Vec<AppAction>, AppError> {
        let chat_id = self.selected.ok_or(AppError::NoChatSelected)?;
        self.send_message(chat_id, text)
    }

    /// Record a search input change.
    ///
    /// The request goes out from [`App::tick`] once input has been quiet for
    /// the configured period. Blank input cancels the search and clears the
    /// suggestion list.
    pub fn query_changed(
        &mut self,
        kind: SuggestionKind,
        text: &str,
        now: I,
    ) -> Result<Vec<AppAction>, AppError> {
        self.session.ensure_connected()?;

        match self.requester.schedule(kind, text, now) {
            Some(_) => Ok(vec![]),
            None => {
                self.state.on_suggestions_cleared();
                Ok(vec![AppAction::Render])
            },
        }
    }

    /// Cancel any pending search and empty the suggestion list.
    pub fn clear_suggestions(&mut self) -> Vec<AppAction> {
        self.requester.cancel();
        self.state.on_suggestions_cleared();
        vec![AppAction::Render]
    }

    /// Change the selected chat.
    pub fn select_chat(&mut self, chat_id: Option<ChatId>) -> Vec<AppAction> {
        self.selected = chat_id;
        vec![AppAction::Render]
    }

    /// Log out and forget local state.
    pub fn logout(&mut self) -> Result<Vec<AppAction>, AppError> {
        let actions = self.session.logout()?;

        self.requester.cancel();
        self.state.reset();
        self.selected = None;
        self.status_message = Some("Logged out".to_string());

        let mut actions: Vec<AppAction> = actions.into_iter().map(AppAction::from).collect();
        actions.push(AppAction::Render);
        Ok(actions)
    }

    /// Fire the pending search if its quiet period has elapsed.
    pub fn tick(&mut self, now: I) -> Vec<AppAction> {
        let Some(query) = self.requester.poll(now) else {
            return vec![];
        };

        match self.session.send(&query.into_frame()) {
            Ok(text) => vec![AppAction::Send(text)],
            Err(err) => {
                tracing::debug!(%err, "dropping suggestion request");
                vec![]
            },
        }
    }

    /// When [`App::tick`] next needs to run. `None` if no timer is pending.
    pub fn next_deadline(&self) -> Option<I> {
        self.requester.deadline()
    }

    /// Read-only projection for rendering.
    pub fn view(&self) -> View<'_> {
        View::new(&self.state, self.selected)
    }

    /// Session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Reconciled chats, directory and suggestions.
    pub fn state(&self) -> &Reconciler {
        &self.state
    }

    /// Selected chat id.
    pub fn selected(&self) -> Option<ChatId> {
        self.selected
    }

    /// Current status line. `None` if nothing to show.
    pub fn status(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}
