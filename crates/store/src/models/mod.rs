//! Typed entity models and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` + `Deserialize` entity struct matching the document
//!   shape (camelCase wire names, store-assigned `id` and `createdAt`)
//! - A create DTO with `validator` rules that serializes to the field set
//!   for [`EntityStore::add`](crate::EntityStore::add)

pub mod project;
pub mod task;

pub use project::{CreateProject, Project};
pub use task::{CreateTask, Task};
