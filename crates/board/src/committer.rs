//! Status-transition persistence.
//!
//! The only write path of the board subsystem. One cross-column drop
//! becomes one single-document `update_fields`; no queue, no retry, no
//! idempotency key. A rejected write is surfaced as an error toast and
//! then forgotten — the board keeps rendering the store's last known
//! truth and the user re-attempts the drag if they still want the move.
//!
//! No lock is taken: if two clients drag the same entity concurrently,
//! store write ordering (last-write-wins on the field) decides, and both
//! clients converge on their next snapshot.

use std::sync::Arc;

use kadro_core::status::{Column, ProjectStatus, TaskStatus};
use kadro_realtime::{Toast, ToastBus};
use kadro_store::fields::{COLLECTION_PROJECTS, COLLECTION_TASKS, FIELD_IS_COMPLETED, FIELD_STATUS};
use kadro_store::EntityStore;
use serde_json::json;

use crate::drag::TransitionIntent;

/// What happened to a commit attempt. Informational only — a failure has
/// already been surfaced as a toast by the time this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    Failed,
}

/// Issues transition writes with user-visible feedback.
pub struct TransitionCommitter {
    store: Arc<dyn EntityStore>,
    toasts: ToastBus,
}

impl TransitionCommitter {
    pub fn new(store: Arc<dyn EntityStore>, toasts: ToastBus) -> Self {
        Self { store, toasts }
    }

    /// Persist a task transition: `status` plus the derived `isCompleted`
    /// flag, kept consistent in the same write.
    pub async fn commit_task(
        &self,
        intent: &TransitionIntent<TaskStatus>,
        title: &str,
    ) -> CommitOutcome {
        let fields = json!({
            FIELD_STATUS: intent.to,
            FIELD_IS_COMPLETED: intent.to.is_completed(),
        });
        self.commit(COLLECTION_TASKS, intent.entity_id.as_str(), title, intent.to.label(), fields)
            .await
    }

    /// Persist a project transition.
    pub async fn commit_project(
        &self,
        intent: &TransitionIntent<ProjectStatus>,
        name: &str,
    ) -> CommitOutcome {
        let fields = json!({ FIELD_STATUS: intent.to });
        self.commit(COLLECTION_PROJECTS, intent.entity_id.as_str(), name, intent.to.label(), fields)
            .await
    }

    async fn commit(
        &self,
        collection: &str,
        id: &str,
        title: &str,
        to_label: &str,
        fields: serde_json::Value,
    ) -> CommitOutcome {
        match self.store.update_fields(collection, id, fields).await {
            Ok(()) => {
                tracing::info!(collection, id, to = to_label, "Transition committed");
                self.toasts
                    .publish(Toast::success(format!("\"{title}\" moved to {to_label}")));
                CommitOutcome::Committed
            }
            Err(e) => {
                // No rollback: the next authoritative snapshot still shows
                // the entity in its original column because the write
                // never took effect.
                tracing::error!(collection, id, to = to_label, error = %e, "Transition failed");
                self.toasts.publish(Toast::error(format!(
                    "Failed to move \"{title}\" to {to_label}"
                )));
                CommitOutcome::Failed
            }
        }
    }
}
