pub mod file;
pub mod memory;

use std::path;
use std::sync::Arc;

use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::StoreBox;

pub struct StoreManager {}

impl StoreManager {
    pub fn get() -> Result<StoreBox> {
        if Config::is_enabled(ConfigKey::Incognito) {
            tracing::debug!("incognito mode, chats are kept in memory only");
            return Ok(Arc::<memory::MemoryStore>::default());
        }

        let data_dir = path::PathBuf::from(Config::get(ConfigKey::DataDir));
        return Ok(Arc::new(file::FileStore::new(data_dir)));
    }
}
