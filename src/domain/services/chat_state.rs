#[cfg(test)]
#[path = "chat_state_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::Message;
use crate::domain::models::Session;
use crate::domain::models::StoreBox;
use crate::domain::models::SESSIONS_KEY;

/// Owns every chat session, newest first, and the index of the one on
/// screen. Each mutation writes the whole collection back to the store
/// before returning.
///
/// The collection is never empty and the active index always points into
/// it.
pub struct ChatState {
    sessions: Vec<Session>,
    active: usize,
    store: StoreBox,
}

impl ChatState {
    pub fn load(store: StoreBox) -> ChatState {
        let mut sessions: Vec<Session> = vec![];

        match store.get(SESSIONS_KEY) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<Session>>(&payload) {
                Ok(saved) => sessions = saved,
                Err(err) => {
                    tracing::error!(error = ?err, "Stored sessions are unreadable, starting fresh");
                }
            },
            Ok(None) => (),
            Err(err) => {
                tracing::error!(error = ?err, "Failed to read stored sessions");
            }
        }

        if sessions.is_empty() {
            sessions.push(Session::new());
        }

        return ChatState {
            sessions,
            active: 0,
            store,
        };
    }

    pub fn sessions(&self) -> &[Session] {
        return &self.sessions;
    }

    pub fn len(&self) -> usize {
        return self.sessions.len();
    }

    pub fn active_index(&self) -> usize {
        return self.active;
    }

    pub fn active(&self) -> &Session {
        return &self.sessions[self.active];
    }

    pub fn get(&self, index: usize) -> Option<&Session> {
        return self.sessions.get(index);
    }

    /// Current position of a session, if it still exists.
    pub fn position(&self, id: &str) -> Option<usize> {
        return self.sessions.iter().position(|e| return e.id == id);
    }

    pub fn create_session(&mut self) {
        self.sessions.insert(0, Session::new());
        self.active = 0;
        self.persist();
    }

    /// Deleting the last remaining session, or an index that does not exist,
    /// does nothing.
    pub fn delete_session(&mut self, index: usize) {
        if self.sessions.len() == 1 {
            return;
        }
        if index >= self.sessions.len() {
            tracing::warn!(index, "Ignoring delete of unknown session");
            return;
        }

        let removed = self.sessions.remove(index);
        tracing::debug!(id = %removed.id, "Deleted session");
        self.active = 0;
        self.persist();
    }

    pub fn select_session(&mut self, index: usize) -> Result<()> {
        if index >= self.sessions.len() {
            bail!(format!(
                "Session {} does not exist, there are {} sessions",
                index + 1,
                self.sessions.len()
            ));
        }

        self.active = index;
        self.persist();
        return Ok(());
    }

    pub fn append_message(&mut self, index: usize, message: Message) -> Result<()> {
        if let Some(session) = self.sessions.get_mut(index) {
            session.push(message);
            self.persist();
            return Ok(());
        }

        bail!(format!("Session {} does not exist", index + 1));
    }

    /// Appends to the session with `id`, returning false when it no longer
    /// exists.
    pub fn append_message_to(&mut self, id: &str, message: Message) -> bool {
        if let Some(index) = self.position(id) {
            return self.append_message(index, message).is_ok();
        }

        return false;
    }

    pub fn rename_session(&mut self, index: usize, name: &str) -> Result<()> {
        if let Some(session) = self.sessions.get_mut(index) {
            session.name = name.to_string();
            self.persist();
            return Ok(());
        }

        bail!(format!("Session {} does not exist", index + 1));
    }

    /// Renames the session with `id`, returning false when it no longer
    /// exists.
    pub fn rename_session_to(&mut self, id: &str, name: &str) -> bool {
        if let Some(index) = self.position(id) {
            return self.rename_session(index, name).is_ok();
        }

        return false;
    }

    /// Drops every session and starts over with a single fresh one.
    pub fn reset(&mut self) {
        self.sessions = vec![Session::new()];
        self.active = 0;
        self.persist();
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.sessions) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to serialize sessions");
                return;
            }
        };

        if let Err(err) = self.store.set(SESSIONS_KEY, &payload) {
            tracing::error!(error = ?err, "Failed to persist sessions");
        }
    }
}
