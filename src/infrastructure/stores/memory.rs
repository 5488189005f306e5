use anyhow::Result;
use dashmap::DashMap;

use crate::domain::models::Store;

/// Nothing written here outlives the process.
#[derive(Default)]
pub struct MemoryStore {
    values: DashMap<String, String>,
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        return Ok(self.values.get(key).map(|val| return val.to_string()));
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        return Ok(());
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.remove(key);
        return Ok(());
    }
}
