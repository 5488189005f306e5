#[cfg(test)]
#[path = "connections_test.rs"]
mod tests;

use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::AppKey;
use crate::domain::models::StoreBox;
use crate::domain::models::NOTION_TOKEN_KEY;

/// Credentials for connected apps. Only the Notion credential is mirrored to
/// the store and handed to the backend, the rest live for the process only.
pub struct Connections {
    credentials: HashMap<AppKey, String>,
    store: StoreBox,
    tx: mpsc::UnboundedSender<Action>,
}

impl Connections {
    pub fn new(store: StoreBox, tx: mpsc::UnboundedSender<Action>) -> Connections {
        return Connections {
            credentials: HashMap::new(),
            store,
            tx,
        };
    }

    pub fn get(&self, app: AppKey) -> Option<&str> {
        return self.credentials.get(&app).map(|e| return e.as_str());
    }

    pub fn is_connected(&self, app: AppKey) -> bool {
        return self.credentials.contains_key(&app);
    }

    /// Reconnects Notion from a previous run, if a credential was stored and
    /// none is held yet.
    pub fn restore(&mut self) -> Result<()> {
        if self.is_connected(AppKey::Notion) {
            return Ok(());
        }

        let token = match self.store.get(NOTION_TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return Ok(()),
            Err(err) => {
                tracing::error!(error = ?err, "Failed to read stored Notion credential");
                return Ok(());
            }
        };

        tracing::debug!("Reconnecting Notion from stored credential");
        self.credentials.insert(AppKey::Notion, token.to_string());
        self.tx.send(Action::PushCredential(token))?;

        return Ok(());
    }

    /// Blank credentials are ignored.
    pub fn connect(&mut self, app: AppKey, credential: &str) -> Result<()> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Ok(());
        }

        self.credentials.insert(app, credential.to_string());
        if !app.is_persisted() {
            return Ok(());
        }

        if let Err(err) = self.store.set(NOTION_TOKEN_KEY, credential) {
            tracing::error!(error = ?err, "Failed to store Notion credential");
        }
        self.tx.send(Action::PushCredential(credential.to_string()))?;

        return Ok(());
    }

    pub fn disconnect(&mut self, app: AppKey) {
        self.credentials.remove(&app);
        if !app.is_persisted() {
            return;
        }

        if let Err(err) = self.store.remove(NOTION_TOKEN_KEY) {
            tracing::error!(error = ?err, "Failed to remove stored Notion credential");
        }
    }
}
