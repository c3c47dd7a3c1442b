//! Application session
//!
//! Wires the [`Store`] to a [`BreakdownService`] behind a [`BreakdownGate`].
//! A breakdown runs in three steps so the caller can keep mutating the store
//! while the request is out:
//!
//! ```text
//! begin_breakdown(task)  -> PendingBreakdown   (None if busy or task missing)
//! PendingBreakdown::run  -> FinishedBreakdown  (async, never fails)
//! finish_breakdown(done) -> new task ids       (one bulk add, then slot freed)
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::breakdown::{BreakdownGate, BreakdownPermit, BreakdownService, get_breakdown};
use crate::domain::{ListId, TaskId};
use crate::store::Store;

/// Result of a full breakdown round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakdownOutcome {
    /// Another breakdown was in flight; this request was dropped
    Busy,
    /// No task with that id
    TaskNotFound,
    /// Subtasks added (possibly none)
    Added(Vec<TaskId>),
}

/// A breakdown request holding the in-flight slot
pub struct PendingBreakdown {
    permit: BreakdownPermit,
    service: Arc<dyn BreakdownService>,
    list_id: ListId,
    title: String,
}

/// Suggestions ready to be applied; still holds the in-flight slot
pub struct FinishedBreakdown {
    permit: BreakdownPermit,
    list_id: ListId,
    subtasks: Vec<String>,
}

impl PendingBreakdown {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Call the service; failures produce an empty suggestion list
    pub async fn run(self) -> FinishedBreakdown {
        debug!(list_id = %self.list_id, title = %self.title, "PendingBreakdown::run: called");
        let subtasks = get_breakdown(self.service.as_ref(), &self.title).await;
        FinishedBreakdown {
            permit: self.permit,
            list_id: self.list_id,
            subtasks,
        }
    }
}

impl FinishedBreakdown {
    pub fn subtasks(&self) -> &[String] {
        &self.subtasks
    }
}

/// Store plus breakdown service
pub struct App {
    store: Store,
    service: Arc<dyn BreakdownService>,
    gate: BreakdownGate,
}

impl App {
    pub fn new(store: Store, service: Arc<dyn BreakdownService>) -> Self {
        Self {
            store,
            service,
            gate: BreakdownGate::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// True while a breakdown request is outstanding
    pub fn is_ai_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Start a breakdown for a task
    ///
    /// Returns None when another breakdown is in flight or the task is unknown.
    pub fn begin_breakdown(&self, task_id: &TaskId) -> Option<PendingBreakdown> {
        debug!(%task_id, "begin_breakdown: called");
        let task = self.store.state().task(task_id)?;
        let permit = self.gate.try_acquire()?;
        Some(PendingBreakdown {
            permit,
            service: Arc::clone(&self.service),
            list_id: task.list_id.clone(),
            title: task.title.clone(),
        })
    }

    /// Apply suggestions as one bulk add, then free the in-flight slot
    pub fn finish_breakdown(&mut self, done: FinishedBreakdown) -> Vec<TaskId> {
        let FinishedBreakdown {
            permit,
            list_id,
            subtasks,
        } = done;
        debug!(%list_id, count = subtasks.len(), "finish_breakdown: called");

        let ids = if subtasks.is_empty() {
            Vec::new()
        } else {
            self.store.bulk_add_tasks(&list_id, &subtasks)
        };
        drop(permit);

        info!(added = ids.len(), "Breakdown applied");
        ids
    }

    /// Begin, run and finish a breakdown in one call
    pub async fn breakdown(&mut self, task_id: &TaskId) -> BreakdownOutcome {
        if self.store.state().task(task_id).is_none() {
            return BreakdownOutcome::TaskNotFound;
        }
        let Some(pending) = self.begin_breakdown(task_id) else {
            return BreakdownOutcome::Busy;
        };
        let done = pending.run().await;
        BreakdownOutcome::Added(self.finish_breakdown(done))
    }
}
