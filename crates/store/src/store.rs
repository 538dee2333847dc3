//! The entity-store trait.

use async_trait::async_trait;
use kadro_core::types::EntityId;

use crate::error::StoreError;
use crate::filter::CollectionFilter;
use crate::subscription::Subscription;

/// Query/listen/mutate primitives of the external document database.
///
/// This is the entire boundary of the board subsystem: one creation
/// primitive, one single-document partial update, and standing
/// subscriptions. No multi-document transaction exists — each status
/// transition and each progress recompute is an independent update, and
/// concurrent writers resolve by last-write-wins on the field.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Create a document. The store assigns the id and the `createdAt`
    /// timestamp and returns the new id.
    async fn add(
        &self,
        collection: &str,
        fields: serde_json::Value,
    ) -> Result<EntityId, StoreError>;

    /// Partially update a single document. Only the given fields change.
    /// Rejects on permission or connectivity failure; a rejected write
    /// leaves the document untouched.
    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: serde_json::Value,
    ) -> Result<(), StoreError>;

    /// Open a standing subscription for all documents in `collection`
    /// matching `filter`. The current result set is delivered promptly as
    /// the first snapshot; every subsequent remote change — including ones
    /// caused by this client's own writes — delivers the complete new set.
    fn subscribe(&self, collection: &str, filter: CollectionFilter) -> Subscription;
}
