//! Project entity model and create DTO.

use kadro_core::status::{BoardItem, ProjectStatus};
use kadro_core::types::{EntityId, OwnerId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::error::StoreError;

/// A project document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub owner_id: OwnerId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    /// Stored derived value: `round(100 * completed / total)` over the
    /// project's tasks, or 0 with no tasks. The aggregator keeps it true;
    /// the manual slider may diverge it until the next task-set change.
    pub progress: u8,
    pub created_at: Timestamp,
}

impl BoardItem for Project {
    type Status = ProjectStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn status(&self) -> ProjectStatus {
        self.status
    }
}

/// DTO for creating a project from the "new project" form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
}

impl CreateProject {
    /// Validate and serialize into the field set for a store `add`.
    ///
    /// New projects start in the first column with zero progress;
    /// `createdAt` is stamped by the store.
    pub fn into_fields(self, owner_id: &str) -> Result<serde_json::Value, StoreError> {
        self.validate()?;
        Ok(json!({
            "ownerId": owner_id,
            "name": self.name,
            "description": self.description,
            "status": ProjectStatus::default(),
            "progress": 0,
        }))
    }
}
