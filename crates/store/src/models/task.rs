//! Task entity model and create DTO.

use kadro_core::status::{BoardItem, TaskPriority, TaskStatus};
use kadro_core::types::{EntityId, OwnerId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::error::StoreError;

/// A task document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub owner_id: OwnerId,
    /// Weak back-reference to the parent project. Lookup only — the task
    /// does not own the project and a transiently missing parent is fine.
    pub project_id: Option<EntityId>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Derived from `status`; every status write keeps it consistent.
    pub is_completed: bool,
    pub created_at: Timestamp,
}

impl BoardItem for Task {
    type Status = TaskStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> TaskStatus {
        self.status
    }
}

/// DTO for creating a task from the "new task" form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub project_id: Option<EntityId>,
    /// Defaults to Medium if omitted.
    pub priority: Option<TaskPriority>,
}

impl CreateTask {
    /// Validate and serialize into the field set for a store `add`.
    ///
    /// New tasks always start in the first column with `isCompleted`
    /// false; `createdAt` is stamped by the store.
    pub fn into_fields(self, owner_id: &str) -> Result<serde_json::Value, StoreError> {
        self.validate()?;
        Ok(json!({
            "ownerId": owner_id,
            "projectId": self.project_id,
            "title": self.title,
            "description": self.description,
            "status": TaskStatus::default(),
            "priority": self.priority.unwrap_or_default(),
            "isCompleted": false,
        }))
    }
}
