//! Reactive project-progress recompute.
//!
//! Runs on every delivered task snapshot — never on a schedule. When the
//! derived percentage differs from the last known value it is persisted
//! back onto the parent project as its own single-document update; a
//! crash between a task transition and this write leaves the stored
//! progress stale until the next task-set event, which is accepted.

use std::sync::Arc;

use kadro_core::progress::completion_percent;
use kadro_core::types::EntityId;
use kadro_store::fields::{COLLECTION_PROJECTS, FIELD_PROGRESS};
use kadro_store::models::Task;
use kadro_store::{EntityStore, StoreError};
use serde_json::json;

/// Keeps one project's stored `progress` in sync with its task set.
pub struct ProgressAggregator {
    store: Arc<dyn EntityStore>,
    project_id: EntityId,
    /// Last value this client knows to be stored, seeded from the project
    /// document when the view opened. `None` forces a write on the first
    /// recompute.
    last_known: Option<u8>,
}

impl ProgressAggregator {
    pub fn new(
        store: Arc<dyn EntityStore>,
        project_id: impl Into<EntityId>,
        last_known: Option<u8>,
    ) -> Self {
        Self {
            store,
            project_id: project_id.into(),
            last_known,
        }
    }

    /// Recompute from a task snapshot and persist if changed.
    ///
    /// Returns the derived percentage either way. A failed write is
    /// logged and dropped; `last_known` is left untouched so the next
    /// task-set change recomputes and tries again.
    pub async fn reconcile(&mut self, tasks: &[Task]) -> u8 {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.status.is_completed()).count();
        let percent = completion_percent(completed, total);

        if self.last_known == Some(percent) {
            return percent;
        }

        match self
            .store
            .update_fields(
                COLLECTION_PROJECTS,
                &self.project_id,
                json!({ FIELD_PROGRESS: percent }),
            )
            .await
        {
            Ok(()) => {
                tracing::debug!(
                    project_id = %self.project_id,
                    completed,
                    total,
                    percent,
                    "Progress recomputed",
                );
                self.last_known = Some(percent);
            }
            Err(e) => {
                tracing::error!(
                    project_id = %self.project_id,
                    error = %e,
                    "Failed to persist recomputed progress",
                );
            }
        }
        percent
    }

    /// Manual slider write. Deliberately allowed to diverge from the
    /// task-derived value — the next task-set change recomputes and
    /// overwrites it, because task-derived truth wins once any task
    /// mutation occurs.
    pub async fn override_progress(&mut self, percent: u8) -> Result<(), StoreError> {
        if percent > 100 {
            return Err(StoreError::Validation(format!(
                "progress must be between 0 and 100, got {percent}"
            )));
        }
        self.store
            .update_fields(
                COLLECTION_PROJECTS,
                &self.project_id,
                json!({ FIELD_PROGRESS: percent }),
            )
            .await?;
        tracing::debug!(project_id = %self.project_id, percent, "Progress overridden");
        self.last_known = Some(percent);
        Ok(())
    }
}
