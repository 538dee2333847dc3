//! Error taxonomy for entity-store operations.

use kadro_core::types::EntityId;

/// Errors surfaced by the entity store.
///
/// Every variant is terminal for the operation that produced it: writes
/// are not retried and failed subscriptions deliver exactly one
/// [`Terminated`](crate::SubscriptionEvent::Terminated) event. Callers in
/// the board layer convert these into a single user-facing toast.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The tenant is not allowed to read or write the target documents.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The store could not be reached (network loss, backend outage).
    #[error("Entity store unavailable: {0}")]
    Unavailable(String),

    /// No document with the given id exists in the collection.
    #[error("{collection} document {id} not found")]
    NotFound { collection: String, id: EntityId },

    /// A document's fields could not be decoded into the typed model.
    #[error("Invalid document in {collection}: {source}")]
    InvalidDocument {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    /// Input failed validation before reaching the store.
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
