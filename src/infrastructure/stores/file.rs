#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::fs;
use std::io;
use std::io::Write;
use std::path;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::Store;

/// Keeps each key in its own file inside `dir`.
pub struct FileStore {
    pub dir: path::PathBuf,
}

impl FileStore {
    pub fn new(dir: path::PathBuf) -> FileStore {
        return FileStore { dir };
    }

    fn get_file_path(&self, key: &str) -> Result<path::PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| return c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!(format!("Invalid store key '{key}'"));
        }

        return Ok(self.dir.join(format!("{key}.json")));
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.get_file_path(key)?;
        match fs::read_to_string(file_path) {
            Ok(payload) => return Ok(Some(payload)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let file_path = self.get_file_path(key)?;
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        // Write beside the target and rename over it so readers never see a
        // half written value.
        let tmp_path = file_path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &file_path)?;

        tracing::debug!(key, bytes = value.len(), "store write");
        return Ok(());
    }

    fn remove(&self, key: &str) -> Result<()> {
        let file_path = self.get_file_path(key)?;
        match fs::remove_file(file_path) {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        }
    }
}
