//! JSON file backend.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::BackendError;
use crate::handle::StoreHandle;

/// A string map persisted to a human-readable JSON file.
///
/// Every `set` and `remove` is written through to disk with an atomic
/// temp-file-and-rename, so a failed write surfaces as an error instead of
/// leaving the file half written.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: HashMap<String, String>,
    backup_enabled: bool,
}

impl FileStore {
    /// Open or create a store at the given file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BackendError> {
        let path = path.as_ref().to_path_buf();
        let data = Self::load(&path)?;

        Ok(Self {
            path,
            data,
            backup_enabled: false,
        })
    }

    /// Enables or disables copying the previous file to `.bak` before saving.
    pub fn with_backup(mut self, enabled: bool) -> Self {
        self.backup_enabled = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save contents to disk. Creates a `.bak` file if backup is enabled.
    pub fn save(&self) -> Result<(), BackendError> {
        if self.backup_enabled && self.path.exists() {
            fs::copy(&self.path, self.path.with_extension("bak"))?;
        }

        let json = serde_json::to_string_pretty(&self.data)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Discards in-memory state and reads the file again.
    pub fn reload(&mut self) -> Result<(), BackendError> {
        self.data = Self::load(&self.path)?;
        Ok(())
    }

    fn load(path: &Path) -> Result<HashMap<String, String>, BackendError> {
        match fs::read_to_string(path) {
            Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl StoreHandle for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        let previous = self.data.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save() {
            // Keep memory consistent with what is on disk
            match previous {
                Some(old) => self.data.insert(key.to_string(), old),
                None => self.data.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        let Some(old) = self.data.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.save() {
            self.data.insert(key.to_string(), old);
            return Err(e);
        }
        Ok(())
    }
}
