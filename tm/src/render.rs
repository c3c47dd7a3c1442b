//! Terminal presentation of lists and tasks

use colored::{Color, Colorize};

use crate::domain::{AppState, Task, TaskList, ThemeColor};

/// Number of id characters shown in listings
pub const SHORT_ID_LEN: usize = 8;

/// Terminal color for a list tag
pub fn terminal_color(tag: ThemeColor) -> Color {
    match tag {
        ThemeColor::Blue => Color::Blue,
        ThemeColor::Purple => Color::Magenta,
        ThemeColor::Emerald => Color::Green,
        ThemeColor::Rose => Color::Red,
        ThemeColor::Amber => Color::Yellow,
        ThemeColor::Indigo => Color::TrueColor { r: 99, g: 102, b: 241 },
    }
}

/// Leading characters of an id, enough to reference it on the command line
pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// One line describing a list
pub fn list_line(state: &AppState, list: &TaskList, active: bool) -> String {
    let total = state.tasks_in(&list.id).count();
    let done = state.tasks_in(&list.id).filter(|t| t.completed).count();
    let marker = if active { "*" } else { " " };
    format!(
        "{} {} {} {} ({}/{})",
        marker.bold(),
        short_id(list.id.as_str()).dimmed(),
        "●".color(terminal_color(list.color)),
        list.name,
        done,
        total
    )
}

/// One line describing a task
pub fn task_line(task: &Task) -> String {
    let (check, title) = if task.completed {
        ("[x]".green(), task.title.dimmed().strikethrough())
    } else {
        ("[ ]".normal(), task.title.normal())
    };
    format!("{} {} {}", check, short_id(task.id.as_str()).dimmed(), title)
}

/// Every list, marking the active one
pub fn lists_view(state: &AppState) -> Vec<String> {
    let active_id = state.active_list().map(|l| l.id.clone());
    state
        .lists
        .iter()
        .map(|list| list_line(state, list, Some(&list.id) == active_id.as_ref()))
        .collect()
}

/// The active list header followed by its tasks, newest first
pub fn tasks_view(state: &AppState) -> Vec<String> {
    let Some(list) = state.active_list() else {
        return vec!["No list selected. Create one with `tm list add <name>`.".dimmed().to_string()];
    };

    let mut lines = vec![format!(
        "{} {}",
        "●".color(terminal_color(list.color)),
        list.name.bold()
    )];
    let tasks = state.active_tasks();
    if tasks.is_empty() {
        lines.push("  (no tasks)".dimmed().to_string());
    }
    lines.extend(tasks.into_iter().map(|t| format!("  {}", task_line(t))));
    lines
}
