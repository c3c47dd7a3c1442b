//! Durable key-value slots

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::error::SlotError;

/// A local key-value slot holding one string per key
pub trait Slot: Send + Sync {
    /// Read the value under `key`, None if nothing was ever written
    fn read(&self, key: &str) -> Result<Option<String>, SlotError>;

    /// Overwrite the value under `key`
    fn write(&self, key: &str, value: &str) -> Result<(), SlotError>;
}

fn check_key(key: &str) -> Result<(), SlotError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(SlotError::InvalidKey(key.to_string()))
    }
}

/// Slot backed by one `<key>.json` file per key in a directory
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Open or create a slot directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, SlotError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| SlotError::Io {
            path: dir.clone(),
            source,
        })?;
        debug!(?dir, "Opened file slot");
        Ok(Self { dir })
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Slot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        check_key(key)?;
        let path = self.path_for(key);
        debug!(path = %path.display(), "FileSlot::read: called");
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SlotError::Io { path, source }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        check_key(key)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        debug!(path = %path.display(), bytes = value.len(), "FileSlot::write: called");

        // write-then-rename keeps the previous value intact if we die mid-write
        fs::write(&tmp, value).map_err(|source| SlotError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| SlotError::Io { path, source })
    }
}

/// In-process slot, nothing survives the process
#[derive(Debug, Default)]
pub struct MemorySlot {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-seeded with one value
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let slot = Self::new();
        slot.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.into());
        slot
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        check_key(key)?;
        Ok(self.values.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        check_key(key)?;
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
