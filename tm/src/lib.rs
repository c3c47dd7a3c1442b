//! TaskMaster - local list and task manager
//!
//! Named lists of tasks with one active list, persisted as a single JSON
//! document, plus an AI breakdown that splits a task into subtasks.
//!
//! Layers, bottom up:
//! - [`domain`] - value types, state invariants and the pure reducer
//! - [`persistence`] - storage slots and the tolerant loader
//! - [`store`] - the single writer of state
//! - [`breakdown`] - subtask suggestions from an external model
//! - [`app`] - store plus breakdown behind the in-flight gate

pub mod app;
pub mod breakdown;
pub mod cli;
pub mod config;
pub mod domain;
pub mod persistence;
pub mod render;
pub mod store;

pub use app::{App, BreakdownOutcome};
pub use breakdown::{BreakdownError, BreakdownService, get_breakdown};
pub use config::Config;
pub use domain::{AppState, ListId, Task, TaskId, TaskList, ThemeColor};
pub use persistence::{FileSlot, MemorySlot, Persistence, Slot};
pub use store::Store;
