//! AppState aggregate and its derived views

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::color::ThemeColor;
use super::id::{ListId, TaskId};
use super::model::{Task, TaskList};

/// Id of the list in the default state
pub const DEFAULT_LIST_ID: &str = "default";

/// Name of the list in the default state
pub const DEFAULT_LIST_NAME: &str = "My First List";

/// The aggregate root: every list, every task and the active selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Lists in creation order
    pub lists: Vec<TaskList>,

    /// Tasks, newest insertions first; display order is derived
    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Selected list, None only when there are no lists
    #[serde(default)]
    pub active_list_id: Option<ListId>,
}

/// The list a view should show: the selected one, else the first list
pub fn active_list<'a>(lists: &'a [TaskList], active_list_id: Option<&ListId>) -> Option<&'a TaskList> {
    active_list_id
        .and_then(|id| lists.iter().find(|l| &l.id == id))
        .or_else(|| lists.first())
}

impl AppState {
    /// The state used when nothing valid has been persisted yet
    pub fn initial(created_at: i64) -> Self {
        Self {
            lists: vec![TaskList::new(
                DEFAULT_LIST_ID,
                DEFAULT_LIST_NAME,
                ThemeColor::Indigo,
                created_at,
            )],
            tasks: Vec::new(),
            active_list_id: Some(ListId::new(DEFAULT_LIST_ID)),
        }
    }

    /// Find a list by id
    pub fn list(&self, id: &ListId) -> Option<&TaskList> {
        self.lists.iter().find(|l| &l.id == id)
    }

    /// Find a task by id
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Tasks owned by a list, in collection order
    pub fn tasks_in<'a>(&'a self, list_id: &'a ListId) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |t| &t.list_id == list_id)
    }

    /// The list currently displayed
    pub fn active_list(&self) -> Option<&TaskList> {
        active_list(&self.lists, self.active_list_id.as_ref())
    }

    /// Tasks of the active list, newest first
    pub fn active_tasks(&self) -> Vec<&Task> {
        let Some(list) = self.active_list() else {
            return Vec::new();
        };
        let mut tasks: Vec<&Task> = self.tasks_in(&list.id).collect();
        // stable: equal timestamps keep insertion order
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
    }

    /// Check referential integrity, selection consistency and id uniqueness
    pub fn is_consistent(&self) -> bool {
        let list_ids: HashSet<&ListId> = self.lists.iter().map(|l| &l.id).collect();
        let task_ids: HashSet<&TaskId> = self.tasks.iter().map(|t| &t.id).collect();

        let selection_ok = match &self.active_list_id {
            None => self.lists.is_empty(),
            Some(id) => list_ids.contains(id),
        };

        list_ids.len() == self.lists.len()
            && task_ids.len() == self.tasks.len()
            && self.tasks.iter().all(|t| list_ids.contains(&t.list_id))
            && selection_ok
    }

    /// Drop orphaned tasks and re-point a dangling selection
    pub fn repaired(mut self) -> Self {
        let list_ids: HashSet<ListId> = self.lists.iter().map(|l| l.id.clone()).collect();

        let before = self.tasks.len();
        self.tasks.retain(|t| list_ids.contains(&t.list_id));
        let dropped = before - self.tasks.len();

        let selection_valid = self.active_list_id.as_ref().is_some_and(|id| list_ids.contains(id));
        if !selection_valid {
            self.active_list_id = self.lists.first().map(|l| l.id.clone());
        }

        debug!(dropped, selection_valid, "repaired: called");
        self
    }
}
