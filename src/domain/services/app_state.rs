#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::collections::HashSet;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::ChatState;
use super::ConnectDialog;
use super::Connections;
use super::DialogOutcome;
use super::Scroll;
use super::Transcript;
use crate::domain::models::Action;
use crate::domain::models::AppKey;
use crate::domain::models::Assistant;
use crate::domain::models::AssistantPrompt;
use crate::domain::models::AssistantResponse;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::SlashCommand;
use crate::domain::models::StoreBox;
use crate::domain::models::TitlePrompt;
use crate::domain::models::TitleResponse;

pub const APOLOGY: &str = "Sorry, there was an error connecting to the backend.";

/// Messages in a session once its first exchange is complete.
const FIRST_EXCHANGE_LENGTH: usize = 3;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /new (/n) - Starts a new chat.
- /delete (/d) [CHAT_NUMBER?] - Deletes a chat, the active one when no number is given. The last chat is always kept.
- /select (/s) [CHAT_NUMBER] - Switches to a chat, numbered from the top of the sidebar.
- /apps (/a) - Opens the apps dialog.
- /connect [APP] [CREDENTIAL] - Connects notion, gmail or trello.
- /disconnect [APP] - Forgets the credential for an app.
- /quit /exit (/q) - Exit Solendir.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Enter - Send your message
- CTRL+N - New chat
- CTRL+X - Delete the active chat
- ALT+Up arrow - Previous chat
- ALT+Down arrow - Next chat
- CTRL+O - Apps dialog
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- Esc - Close this menu or the apps dialog
- CTRL+C - Exit Solendir.
        "#;

    return text.trim().to_string();
}

/// Everything the terminal UI shows, mutated one event at a time by the UI
/// loop.
pub struct AppState {
    pub chats: ChatState,
    pub connections: Connections,
    pub dialog: Option<ConnectDialog>,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub loading: bool,
    pub pending_titles: HashSet<String>,
    pub scroll: Scroll,
    pub show_help: bool,
    pub status: Option<String>,
    pub transcript: Transcript,
    tx: mpsc::UnboundedSender<Action>,
}

impl AppState {
    pub fn new(store: StoreBox, tx: mpsc::UnboundedSender<Action>) -> Result<AppState> {
        let mut app_state = AppState {
            chats: ChatState::load(store.clone()),
            connections: Connections::new(store, tx.clone()),
            dialog: None,
            last_known_height: 0,
            last_known_width: 0,
            loading: false,
            pending_titles: HashSet::new(),
            scroll: Scroll::default(),
            show_help: false,
            status: None,
            transcript: Transcript::default(),
            tx,
        };

        app_state.connections.restore()?;
        app_state.sync_dependants();
        app_state.scroll.last();

        return Ok(app_state);
    }

    /// Warns in the status line when the backend can't be reached.
    pub async fn check_backend<A>(&mut self, assistant: &A)
    where
        A: Assistant + ?Sized,
    {
        if let Err(err) = assistant.health_check().await {
            tracing::warn!(error = ?err, "Backend health check failed");
            self.status = Some(format!(
                "Hey, it looks like the backend isn't running, I can't connect to it. Messages will fail until it is. Error: {err}"
            ));
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    /// Sends `input` from the active session. Ignored while a reply is
    /// pending or when there is nothing to send.
    pub fn submit(&mut self, input: &str) -> Result<()> {
        if self.loading || input.trim().is_empty() {
            return Ok(());
        }

        let index = self.chats.active_index();
        let session_id = self.chats.active().id.to_string();
        self.chats
            .append_message(index, Message::now(Role::User, input))?;
        self.loading = true;

        tracing::debug!(session_id = %session_id, "Sending message");
        self.tx.send(Action::AssistantRequest(AssistantPrompt {
            session_id,
            text: input.to_string(),
        }))?;

        self.sync_dependants();
        self.scroll.last();
        return Ok(());
    }

    pub fn handle_assistant_response(&mut self, response: AssistantResponse) -> Result<()> {
        self.loading = false;

        let succeeded = response.result.is_ok();
        let content = match response.result {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!(session_id = %response.session_id, error = %err, "Assistant request failed");
                APOLOGY.to_string()
            }
        };

        let appended = self
            .chats
            .append_message_to(&response.session_id, Message::now(Role::Assistant, &content));
        if !appended {
            tracing::warn!(session_id = %response.session_id, "Dropping reply for a deleted session");
            return Ok(());
        }

        if succeeded {
            self.request_title(&response.session_id)?;
        }

        self.sync_dependants();
        if self.chats.active().id == response.session_id {
            self.scroll.last();
        }
        return Ok(());
    }

    fn request_title(&mut self, session_id: &str) -> Result<()> {
        let session = match self.chats.position(session_id) {
            Some(index) => &self.chats.sessions()[index],
            None => return Ok(()),
        };
        if session.messages.len() != FIRST_EXCHANGE_LENGTH {
            return Ok(());
        }

        self.pending_titles.insert(session_id.to_string());
        self.tx.send(Action::TitleRequest(TitlePrompt {
            session_id: session_id.to_string(),
            exchange: session.messages.to_vec(),
        }))?;

        return Ok(());
    }

    pub fn handle_title_response(&mut self, response: TitleResponse) {
        self.pending_titles.remove(&response.session_id);

        if let Some(title) = response.title {
            if !self.chats.rename_session_to(&response.session_id, &title) {
                tracing::warn!(session_id = %response.session_id, "Dropping title for a deleted session");
            }
        }
    }

    pub fn create_session(&mut self) {
        self.chats.create_session();
        self.sync_dependants();
        self.scroll.last();
    }

    pub fn delete_session(&mut self, index: usize) {
        if self.chats.len() == 1 {
            self.status = Some("The last chat can't be deleted.".to_string());
            return;
        }
        if index >= self.chats.len() {
            self.status = Some(format!("Chat {} does not exist.", index + 1));
            return;
        }

        self.chats.delete_session(index);
        self.sync_dependants();
        self.scroll.last();
    }

    pub fn select_session(&mut self, index: usize) {
        if let Err(err) = self.chats.select_session(index) {
            self.status = Some(err.to_string());
            return;
        }

        self.sync_dependants();
        self.scroll.last();
    }

    pub fn previous_session(&mut self) {
        let index = self.chats.active_index();
        if index > 0 {
            self.select_session(index - 1);
        }
    }

    pub fn next_session(&mut self) {
        let index = self.chats.active_index();
        if index + 1 < self.chats.len() {
            self.select_session(index + 1);
        }
    }

    pub fn open_dialog(&mut self) {
        self.show_help = false;
        self.dialog = Some(ConnectDialog::default());
    }

    pub fn connect_app(&mut self, app: AppKey, credential: &str) -> Result<()> {
        if credential.trim().is_empty() {
            self.status = Some(format!("A credential is required to connect {}.", app.display_name()));
            return Ok(());
        }

        self.connections.connect(app, credential)?;
        self.status = Some(format!("Connected {}.", app.display_name()));
        return Ok(());
    }

    pub fn disconnect_app(&mut self, app: AppKey) {
        self.connections.disconnect(app);
        self.status = Some(format!("Disconnected {}.", app.display_name()));
    }

    /// Applies what the apps dialog asked for, closing it when done.
    pub fn handle_dialog_outcome(&mut self, outcome: DialogOutcome) -> Result<()> {
        match outcome {
            DialogOutcome::Close => self.dialog = None,
            DialogOutcome::Connect(app, credential) => self.connect_app(app, &credential)?,
            DialogOutcome::Disconnect(app) => self.disconnect_app(app),
            DialogOutcome::Pending => (),
        }

        return Ok(());
    }

    fn parse_app(&mut self, command: &SlashCommand, usage: &str) -> Option<AppKey> {
        let app = command.args.first().and_then(|e| return AppKey::parse(e));
        if app.is_none() {
            self.status = Some(format!("{usage} APP must be one of notion, gmail or trello."));
        }

        return app;
    }

    /// Runs a slash command, returning true when the app should exit.
    pub fn run_command(&mut self, command: &SlashCommand) -> Result<bool> {
        if command.is_quit() {
            return Ok(true);
        }

        if command.is_new_session() {
            self.create_session();
        } else if command.is_delete_session() {
            if command.args.is_empty() {
                self.delete_session(self.chats.active_index());
            } else if let Some(index) = command.session_index() {
                self.delete_session(index);
            } else {
                self.status = Some("Usage: /delete [CHAT_NUMBER]".to_string());
            }
        } else if command.is_select_session() {
            if let Some(index) = command.session_index() {
                self.select_session(index);
            } else {
                self.status = Some("Usage: /select CHAT_NUMBER".to_string());
            }
        } else if command.is_apps() {
            self.open_dialog();
        } else if command.is_connect() {
            if let Some(app) = self.parse_app(command, "Usage: /connect APP CREDENTIAL.") {
                self.connect_app(app, &command.args[1..].join(" "))?;
            }
        } else if command.is_disconnect() {
            if let Some(app) = self.parse_app(command, "Usage: /disconnect APP.") {
                self.disconnect_app(app);
            }
        } else if command.is_help() {
            self.dialog = None;
            self.show_help = true;
        }

        return Ok(false);
    }

    fn sync_dependants(&mut self) {
        let follow = self.scroll.is_at_bottom();
        self.transcript.set_messages(
            &self.chats.active().messages,
            self.last_known_width as usize,
        );

        self.scroll
            .set_state(self.transcript.len() as u16, self.last_known_height);
        if follow {
            self.scroll.last();
        }
    }
}
