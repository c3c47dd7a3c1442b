//! Application state store
//!
//! The single writer of [`AppState`]. Each operation mints whatever ids and
//! timestamps it needs, reduces one [`Intent`], and saves through the
//! [`Persistence`] adapter when the state actually changed.

use tracing::{debug, info};

use crate::domain::{
    AppState, Intent, ListId, Minter, SystemMinter, Task, TaskDraft, TaskId, TaskList, ThemeColor, reduce,
};
use crate::persistence::Persistence;

/// Owns the canonical state and its persistence
pub struct Store {
    state: AppState,
    persistence: Persistence,
    minter: Box<dyn Minter>,
    revision: u64,
}

impl Store {
    /// Load persisted state (or the default state) and take ownership of it
    pub fn open(persistence: Persistence) -> Self {
        Self::with_minter(persistence, SystemMinter)
    }

    /// Like [`Store::open`] with a custom id/clock source
    pub fn with_minter(persistence: Persistence, minter: impl Minter + 'static) -> Self {
        let state = persistence.load();
        info!(
            lists = state.lists.len(),
            tasks = state.tasks.len(),
            "Store opened"
        );
        Self {
            state,
            persistence,
            minter: Box::new(minter),
            revision: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Number of committed changes since the store was opened
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn active_list(&self) -> Option<&TaskList> {
        self.state.active_list()
    }

    pub fn active_tasks(&self) -> Vec<&Task> {
        self.state.active_tasks()
    }

    /// Reduce an intent; saves and returns true if the state changed
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        let next = reduce(&self.state, intent);
        if next == self.state {
            debug!("dispatch: no change");
            return false;
        }
        self.state = next;
        self.revision += 1;
        debug!(revision = self.revision, "dispatch: committed");
        self.persistence.save(&self.state);
        true
    }

    /// Create a list and make it active
    ///
    /// The name is stored as given; callers trim and reject empty names.
    pub fn add_list(&mut self, name: impl Into<String>, color: ThemeColor) -> ListId {
        let list = TaskList::new(self.minter.mint_id(), name, color, self.minter.now_millis());
        let id = list.id.clone();
        debug!(%id, %color, "add_list: called");
        self.dispatch(Intent::AddList(list));
        id
    }

    /// Delete a list and all of its tasks
    pub fn delete_list(&mut self, id: &ListId) {
        debug!(%id, "delete_list: called");
        self.dispatch(Intent::DeleteList(id.clone()));
    }

    pub fn rename_list(&mut self, id: &ListId, name: impl Into<String>) {
        debug!(%id, "rename_list: called");
        self.dispatch(Intent::RenameList {
            id: id.clone(),
            name: name.into(),
        });
    }

    /// Add a task to the active list; None when there is no list to add to
    pub fn add_task(&mut self, title: impl Into<String>) -> Option<TaskId> {
        let draft = self.draft(title.into(), None);
        let id = draft.id.clone();
        debug!(%id, "add_task: called");
        self.dispatch(Intent::AddTask(draft));
        self.state.task(&id).map(|t| t.id.clone())
    }

    pub fn toggle_task(&mut self, id: &TaskId) {
        debug!(%id, "toggle_task: called");
        self.dispatch(Intent::ToggleTask(id.clone()));
    }

    pub fn delete_task(&mut self, id: &TaskId) {
        debug!(%id, "delete_task: called");
        self.dispatch(Intent::DeleteTask(id.clone()));
    }

    /// Select a list; the id is not validated
    pub fn select_list(&mut self, id: &ListId) {
        debug!(%id, "select_list: called");
        self.dispatch(Intent::SelectList(id.clone()));
    }

    /// Add one task per title to a list in a single transition
    ///
    /// Returns the ids of the tasks added, empty if the list no longer exists.
    pub fn bulk_add_tasks(&mut self, list_id: &ListId, titles: &[String]) -> Vec<TaskId> {
        debug!(%list_id, count = titles.len(), "bulk_add_tasks: called");
        if titles.is_empty() {
            return Vec::new();
        }

        // one timestamp for the batch keeps suggestion order in the newest-first view
        let created_at = self.minter.now_millis();
        let drafts: Vec<TaskDraft> = titles.iter().map(|t| self.draft(t.clone(), Some(created_at))).collect();
        let ids: Vec<TaskId> = drafts.iter().map(|d| d.id.clone()).collect();

        if self.dispatch(Intent::BulkAddTasks {
            list_id: list_id.clone(),
            tasks: drafts,
        }) {
            ids
        } else {
            Vec::new()
        }
    }

    fn draft(&mut self, title: String, created_at: Option<i64>) -> TaskDraft {
        TaskDraft {
            id: TaskId::new(self.minter.mint_id()),
            title,
            created_at: created_at.unwrap_or_else(|| self.minter.now_millis()),
        }
    }
}
