//! State transitions
//!
//! Every mutation is an [`Intent`] reduced against the current state into a
//! new state. Ids and timestamps arrive pre-minted inside the intent, so
//! [`reduce`] is a pure function. Intents that target something missing
//! return the state unchanged.

use tracing::debug;

use super::id::{ListId, TaskId};
use super::model::{Task, TaskList};
use super::state::AppState;

/// A task before it is attached to a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub id: TaskId,
    pub title: String,
    pub created_at: i64,
}

impl TaskDraft {
    fn into_task(self, list_id: ListId) -> Task {
        Task::new(self.id, list_id, self.title, self.created_at)
    }
}

/// A requested change to the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Append a list and make it active
    AddList(TaskList),

    /// Remove a list and every task in it; if it was the active list, the
    /// first remaining list becomes active
    DeleteList(ListId),

    /// Replace a list's name
    RenameList { id: ListId, name: String },

    /// Prepend a task to the active list
    AddTask(TaskDraft),

    /// Flip a task's completed flag
    ToggleTask(TaskId),

    /// Remove a task
    DeleteTask(TaskId),

    /// Set the active list id, without checking it exists
    SelectList(ListId),

    /// Prepend a batch of tasks to one list
    BulkAddTasks { list_id: ListId, tasks: Vec<TaskDraft> },
}

/// Apply an intent, producing the next state
pub fn reduce(state: &AppState, intent: Intent) -> AppState {
    debug!(?intent, "reduce: called");
    let mut next = state.clone();

    match intent {
        Intent::AddList(list) => {
            next.active_list_id = Some(list.id.clone());
            next.lists.push(list);
        }
        Intent::DeleteList(id) => {
            if state.list(&id).is_none() {
                debug!(%id, "reduce: DeleteList target missing");
                return next;
            }
            let was_active = state.active_list().is_some_and(|l| l.id == id);
            next.lists.retain(|l| l.id != id);
            next.tasks.retain(|t| t.list_id != id);

            if was_active {
                next.active_list_id = next.lists.first().map(|l| l.id.clone());
            }
        }
        Intent::RenameList { id, name } => {
            if let Some(list) = next.lists.iter_mut().find(|l| l.id == id) {
                list.name = name;
            }
        }
        Intent::AddTask(draft) => {
            let Some(list_id) = state.active_list().map(|l| l.id.clone()) else {
                debug!("reduce: AddTask without an active list");
                return next;
            };
            next.tasks.insert(0, draft.into_task(list_id));
        }
        Intent::ToggleTask(id) => {
            if let Some(task) = next.tasks.iter_mut().find(|t| t.id == id) {
                task.completed = !task.completed;
            }
        }
        Intent::DeleteTask(id) => {
            next.tasks.retain(|t| t.id != id);
        }
        Intent::SelectList(id) => {
            next.active_list_id = Some(id);
        }
        Intent::BulkAddTasks { list_id, tasks } => {
            // the list may have been deleted while suggestions were pending
            if state.list(&list_id).is_none() {
                debug!(%list_id, "reduce: BulkAddTasks target list missing");
                return next;
            }
            let batch: Vec<Task> = tasks.into_iter().map(|d| d.into_task(list_id.clone())).collect();
            next.tasks.splice(0..0, batch);
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ThemeColor;
    use crate::domain::strategy::arb_state;
    use proptest::prelude::*;

    fn draft(id: &str, title: &str, created_at: i64) -> TaskDraft {
        TaskDraft {
            id: TaskId::new(id),
            title: title.to_string(),
            created_at,
        }
    }

    fn two_lists() -> AppState {
        let mut state = AppState::initial(0);
        state = reduce(&state, Intent::AddList(TaskList::new("work", "Work", ThemeColor::Indigo, 1)));
        state = reduce(&state, Intent::AddList(TaskList::new("home", "Home", ThemeColor::Rose, 2)));
        state
    }

    #[test]
    fn test_add_list_appends_and_activates() {
        let state = two_lists();

        let names: Vec<&str> = state.lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["My First List", "Work", "Home"]);
        assert_eq!(state.active_list_id, Some(ListId::new("home")));
    }

    #[test]
    fn test_delete_active_list_selects_first_remaining() {
        let state = two_lists();
        let state = reduce(&state, Intent::DeleteList(ListId::new("home")));

        assert_eq!(state.active_list_id, Some(ListId::new("default")));
        assert!(state.is_consistent());
    }

    #[test]
    fn test_delete_inactive_list_keeps_selection() {
        let state = two_lists();
        let state = reduce(&state, Intent::AddTask(draft("t1", "Report", 5)));
        let state = reduce(&state, Intent::SelectList(ListId::new("work")));
        let state = reduce(&state, Intent::AddTask(draft("t2", "Email", 6)));
        let state = reduce(&state, Intent::SelectList(ListId::new("home")));

        let state = reduce(&state, Intent::DeleteList(ListId::new("work")));

        assert_eq!(state.active_list_id, Some(ListId::new("home")));
        assert_eq!(state.tasks_in(&ListId::new("work")).count(), 0);
        assert_eq!(state.tasks.len(), 1);
    }

    #[test]
    fn test_delete_other_list_leaves_stale_selection_alone() {
        let state = two_lists();
        let state = reduce(&state, Intent::SelectList(ListId::new("ghost")));
        let state = reduce(&state, Intent::DeleteList(ListId::new("home")));

        assert_eq!(state.active_list_id, Some(ListId::new("ghost")));
        assert_eq!(state.active_list().unwrap().id.as_str(), "default");
    }

    #[test]
    fn test_delete_fallback_active_list_repoints_stale_selection() {
        let state = two_lists();
        let state = reduce(&state, Intent::SelectList(ListId::new("ghost")));
        let state = reduce(&state, Intent::DeleteList(ListId::new("default")));

        assert_eq!(state.active_list_id, Some(ListId::new("work")));
        assert!(state.is_consistent());
    }

    #[test]
    fn test_delete_last_list_clears_selection() {
        let state = AppState::initial(0);
        let state = reduce(&state, Intent::DeleteList(ListId::new("default")));

        assert!(state.lists.is_empty());
        assert_eq!(state.active_list_id, None);
    }

    #[test]
    fn test_delete_missing_list_is_noop() {
        let state = two_lists();
        assert_eq!(reduce(&state, Intent::DeleteList(ListId::new("nope"))), state);
    }

    #[test]
    fn test_rename_list() {
        let state = two_lists();
        let state = reduce(
            &state,
            Intent::RenameList {
                id: ListId::new("work"),
                name: "  Office ".to_string(),
            },
        );
        // stored verbatim
        assert_eq!(state.list(&ListId::new("work")).unwrap().name, "  Office ");

        let unchanged = reduce(
            &state,
            Intent::RenameList {
                id: ListId::new("nope"),
                name: "x".to_string(),
            },
        );
        assert_eq!(unchanged, state);
    }

    #[test]
    fn test_add_task_prepends_to_active_list() {
        let state = two_lists();
        let state = reduce(&state, Intent::AddTask(draft("t1", "First", 10)));
        let state = reduce(&state, Intent::AddTask(draft("t2", "Second", 11)));

        assert_eq!(state.tasks[0].id.as_str(), "t2");
        assert!(state.tasks.iter().all(|t| t.list_id.as_str() == "home"));
        assert!(!state.tasks[0].completed);
    }

    #[test]
    fn test_add_task_with_stale_selection_uses_first_list() {
        let state = two_lists();
        let state = reduce(&state, Intent::SelectList(ListId::new("gone")));
        let state = reduce(&state, Intent::AddTask(draft("t1", "Orphan?", 10)));

        assert_eq!(state.tasks[0].list_id.as_str(), "default");
    }

    #[test]
    fn test_add_task_without_lists_is_noop() {
        let state = AppState::default();
        assert_eq!(reduce(&state, Intent::AddTask(draft("t1", "x", 1))), state);
    }

    #[test]
    fn test_double_toggle_restores() {
        let state = reduce(&AppState::initial(0), Intent::AddTask(draft("t1", "x", 1)));
        let once = reduce(&state, Intent::ToggleTask(TaskId::new("t1")));
        assert!(once.tasks[0].completed);

        let twice = reduce(&once, Intent::ToggleTask(TaskId::new("t1")));
        assert_eq!(twice, state);
    }

    #[test]
    fn test_toggle_and_delete_missing_task_are_noops() {
        let state = reduce(&AppState::initial(0), Intent::AddTask(draft("t1", "x", 1)));
        assert_eq!(reduce(&state, Intent::ToggleTask(TaskId::new("nope"))), state);
        assert_eq!(reduce(&state, Intent::DeleteTask(TaskId::new("nope"))), state);
    }

    #[test]
    fn test_select_list_is_unconditional() {
        let state = reduce(&AppState::initial(0), Intent::SelectList(ListId::new("ghost")));
        assert_eq!(state.active_list_id, Some(ListId::new("ghost")));
        assert_eq!(state.active_list().unwrap().id.as_str(), "default");
    }

    #[test]
    fn test_bulk_add_prepends_batch_in_order() {
        let state = reduce(&AppState::initial(0), Intent::AddTask(draft("old", "Old", 1)));
        let state = reduce(
            &state,
            Intent::BulkAddTasks {
                list_id: ListId::new("default"),
                tasks: vec![draft("s1", "One", 5), draft("s2", "Two", 5)],
            },
        );

        let ids: Vec<&str> = state.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2", "old"]);

        let shown: Vec<&str> = state.active_tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(shown, vec!["One", "Two", "Old"]);
    }

    #[test]
    fn test_bulk_add_to_missing_list_is_noop() {
        let state = AppState::initial(0);
        let next = reduce(
            &state,
            Intent::BulkAddTasks {
                list_id: ListId::new("gone"),
                tasks: vec![draft("s1", "One", 5)],
            },
        );
        assert_eq!(next, state);
    }

    proptest! {
        #[test]
        fn prop_delete_list_cascades(state in arb_state(), victim in 0usize..5) {
            let id = state.lists[victim % state.lists.len()].id.clone();
            let next = reduce(&state, Intent::DeleteList(id.clone()));

            let expected: Vec<Task> = state.tasks.iter().filter(|t| t.list_id != id).cloned().collect();
            prop_assert_eq!(&next.tasks, &expected);
            prop_assert!(next.is_consistent());
        }

        #[test]
        fn prop_delete_active_list_selects_first_remaining(state in arb_state()) {
            let active = state.active_list_id.clone().unwrap();
            let next = reduce(&state, Intent::DeleteList(active));

            prop_assert_eq!(next.active_list_id, next.lists.first().map(|l| l.id.clone()));
        }

        #[test]
        fn prop_bulk_add_adds_exactly_n(state in arb_state(), titles in proptest::collection::vec("[a-z]{1,8}", 0..6)) {
            let list_id = state.lists[0].id.clone();
            let drafts: Vec<TaskDraft> = titles
                .iter()
                .enumerate()
                .map(|(i, title)| draft(&format!("new{}", i), title, 100))
                .collect();
            let next = reduce(&state, Intent::BulkAddTasks { list_id: list_id.clone(), tasks: drafts });

            prop_assert_eq!(next.tasks.len(), state.tasks.len() + titles.len());
            for task in &next.tasks[..titles.len()] {
                prop_assert_eq!(&task.list_id, &list_id);
                prop_assert!(!task.completed);
            }
        }
    }
}
