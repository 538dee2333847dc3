//! Collection and document field names.
//!
//! The document database stores camelCase field names (the wire shape of
//! the surrounding web application). Mutations and filters refer to fields
//! by these constants; typed models map to them via serde rename rules.

/// Collection holding project documents.
pub const COLLECTION_PROJECTS: &str = "projects";

/// Collection holding task documents.
pub const COLLECTION_TASKS: &str = "tasks";

/// Owning tenant/user id. Set at creation, never changed.
pub const FIELD_OWNER_ID: &str = "ownerId";

/// Weak back-reference from a task to its parent project.
pub const FIELD_PROJECT_ID: &str = "projectId";

/// Board status, one of the closed enumerations.
pub const FIELD_STATUS: &str = "status";

/// Derived flag on tasks, kept consistent with `status == completed`.
pub const FIELD_IS_COMPLETED: &str = "isCompleted";

/// Stored derived completion percentage on projects.
pub const FIELD_PROGRESS: &str = "progress";

/// Store-assigned creation timestamp.
pub const FIELD_CREATED_AT: &str = "createdAt";
