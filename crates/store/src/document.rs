//! Raw documents as delivered by the entity store.

use kadro_core::types::EntityId;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// A single document: its store-assigned id plus a JSON object of fields.
///
/// The id is not part of the field object — it is assigned by the store
/// and carried alongside, the way the underlying document database exposes
/// it. [`decode`](Document::decode) folds it back in so typed models can
/// carry an `id` field.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: EntityId,
    pub fields: serde_json::Value,
}

impl Document {
    pub fn new(id: impl Into<EntityId>, fields: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Read a top-level string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_str())
    }

    /// Decode the document into a typed model.
    ///
    /// The document id is merged into the field object under `"id"` before
    /// deserializing, so model structs declare `id` like any other field.
    pub fn decode<T: DeserializeOwned>(&self, collection: &str) -> Result<T, StoreError> {
        let mut value = self.fields.clone();
        if let Some(object) = value.as_object_mut() {
            object.insert("id".to_string(), serde_json::Value::String(self.id.clone()));
        }
        serde_json::from_value(value).map_err(|source| StoreError::InvalidDocument {
            collection: collection.to_string(),
            source,
        })
    }
}
