use std::sync::Arc;

use anyhow::Result;

/// Key holding the JSON array of chat sessions.
pub const SESSIONS_KEY: &str = "solendir_chats";

/// Key holding the raw Notion credential.
pub const NOTION_TOKEN_KEY: &str = "notion_token";

/// Durable string key-value storage. Each call is synchronous and atomic on
/// its own, there are no transactions across keys.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a key that does not exist is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

pub type StoreBox = Arc<dyn Store + Send + Sync>;
