//! Persistence adapter
//!
//! Saves the whole [`AppState`] as one JSON document under a fixed key in a
//! [`Slot`]. Loading never fails: a missing, unreadable or malformed document
//! yields the default state. Saving never fails either: errors are logged and
//! the in-memory state stays authoritative.
//!
//! ```text
//! { "lists":  [{ "id", "name", "color", "createdAt" }],
//!   "tasks":  [{ "id", "listId", "title", "completed", "createdAt" }],
//!   "activeListId": "..." | null }
//! ```

mod error;
mod slot;

pub use error::{PersistError, SlotError};
pub use slot::{FileSlot, MemorySlot, Slot};

use tracing::{debug, info, warn};

use crate::domain::AppState;

/// Key the state document is stored under
pub const STORAGE_KEY: &str = "taskmaster_db_v1";

/// Reads and writes the application state through a slot
pub struct Persistence {
    slot: Box<dyn Slot>,
    key: String,
}

impl Persistence {
    /// Persist under [`STORAGE_KEY`]
    pub fn new(slot: impl Slot + 'static) -> Self {
        Self::with_key(slot, STORAGE_KEY)
    }

    pub fn with_key(slot: impl Slot + 'static, key: impl Into<String>) -> Self {
        Self {
            slot: Box::new(slot),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Save the state, logging and dropping any failure
    pub fn save(&self, state: &AppState) {
        if let Err(e) = self.try_save(state) {
            warn!(key = %self.key, error = %e, "save: failed, keeping in-memory state");
        }
    }

    /// Save the state, reporting failures
    pub fn try_save(&self, state: &AppState) -> Result<(), PersistError> {
        debug!(
            key = %self.key,
            lists = state.lists.len(),
            tasks = state.tasks.len(),
            "try_save: called"
        );
        let document = serde_json::to_string(state)?;
        self.slot.write(&self.key, &document)?;
        Ok(())
    }

    /// Load the state, falling back to the default state
    pub fn load(&self) -> AppState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                info!(key = %self.key, "load: no saved state, using default");
                AppState::initial(chrono::Utc::now().timestamp_millis())
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "load: unusable saved state, using default");
                AppState::initial(chrono::Utc::now().timestamp_millis())
            }
        }
    }

    /// Load the state, Ok(None) when nothing has been saved
    ///
    /// Missing `tasks`/`activeListId` fields and unknown colors are defaulted,
    /// orphaned tasks dropped and a dangling selection re-pointed.
    pub fn try_load(&self) -> Result<Option<AppState>, PersistError> {
        debug!(key = %self.key, "try_load: called");
        let Some(document) = self.slot.read(&self.key)? else {
            return Ok(None);
        };
        parse_document(&document).map(Some)
    }
}

/// Parse a persisted state document
pub fn parse_document(document: &str) -> Result<AppState, PersistError> {
    let mut value: serde_json::Value = serde_json::from_str(document)?;
    let Some(fields) = value.as_object_mut() else {
        return Err(PersistError::Shape("document is not an object".to_string()));
    };

    match fields.get("lists") {
        Some(serde_json::Value::Array(_)) => {}
        Some(other) => return Err(PersistError::Shape(format!("'lists' is not an array: {}", other))),
        None => return Err(PersistError::Shape("missing 'lists'".to_string())),
    }

    // null tasks and a non-string selection are treated as absent
    if fields.get("tasks").is_some_and(|t| t.is_null()) {
        fields.remove("tasks");
    }
    if fields.get("activeListId").is_some_and(|a| !a.is_string()) {
        debug!(active = %fields["activeListId"], "parse_document: ignoring malformed activeListId");
        fields.remove("activeListId");
    }

    let state: AppState = serde_json::from_value(value)?;
    Ok(state.repaired())
}
