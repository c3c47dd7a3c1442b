//! Domain types for TaskMaster
//!
//! - [`TaskList`] and [`Task`] records
//! - [`AppState`], the aggregate root, with its derived views
//! - [`Intent`] and [`reduce`], the only way state changes

mod color;
mod id;
mod intent;
mod model;
mod state;

pub use color::{ThemeColor, UnknownColor};
pub use id::{IdResolver, ListId, Minter, SequenceMinter, SystemMinter, TaskId, generate_id};
pub use intent::{Intent, TaskDraft, reduce};
pub use model::{Task, TaskList};
pub use state::{AppState, DEFAULT_LIST_ID, DEFAULT_LIST_NAME, active_list};

#[cfg(test)]
pub(crate) use state::strategy;
