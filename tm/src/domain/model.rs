//! Task and TaskList records
//!
//! Field names serialize in camelCase to match the persisted document.

use serde::{Deserialize, Serialize};

use super::color::ThemeColor;
use super::id::{ListId, TaskId};

/// A named, colored container for tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub id: ListId,

    /// Display name (the only mutable field)
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub color: ThemeColor,

    /// Creation time (unix ms)
    #[serde(default)]
    pub created_at: i64,
}

impl TaskList {
    pub fn new(id: impl Into<ListId>, name: impl Into<String>, color: ThemeColor, created_at: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            created_at,
        }
    }
}

/// A single actionable item belonging to exactly one list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,

    /// Owning list
    pub list_id: ListId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub completed: bool,

    /// Creation time (unix ms), used only for display order
    #[serde(default)]
    pub created_at: i64,
}

impl Task {
    /// A new, not yet completed task
    pub fn new(id: impl Into<TaskId>, list_id: ListId, title: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            list_id,
            title: title.into(),
            completed: false,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task::new("t1", ListId::new("l1"), "Buy milk", 42);
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["id"], "t1");
        assert_eq!(json["listId"], "l1");
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["completed"], false);
        assert_eq!(json["createdAt"], 42);
    }

    #[test]
    fn test_list_missing_fields_default() {
        let list: TaskList = serde_json::from_str(r#"{"id": "l1"}"#).unwrap();
        assert_eq!(list.name, "");
        assert_eq!(list.color, ThemeColor::Indigo);
        assert_eq!(list.created_at, 0);
    }
}
