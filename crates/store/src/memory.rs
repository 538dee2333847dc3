//! In-memory entity store with snapshot fan-out.
//!
//! [`MemoryStore`] implements [`EntityStore`] with the same delivery
//! semantics as the managed document database: every mutation pushes the
//! complete current result set to each matching listener. It backs the
//! integration tests and local development; the production adapter to the
//! real backend lives in the surrounding application.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use indexmap::IndexMap;
use kadro_core::types::EntityId;
use serde_json::json;
use tokio::sync::mpsc;

use crate::document::Document;
use crate::error::StoreError;
use crate::fields::FIELD_CREATED_AT;
use crate::filter::CollectionFilter;
use crate::store::EntityStore;
use crate::subscription::{Subscription, SubscriptionEvent};

/// One registered listener.
struct Listener {
    collection: String,
    filter: CollectionFilter,
    sender: mpsc::UnboundedSender<SubscriptionEvent>,
}

/// Documents per collection, in insertion (creation) order.
type Collections = HashMap<String, IndexMap<EntityId, serde_json::Value>>;

/// In-memory [`EntityStore`] implementation.
///
/// Thread-safe via interior locks; designed to be wrapped in `Arc` and
/// shared across board sessions. Snapshot order is creation order — the
/// store keeps no manual rank.
pub struct MemoryStore {
    collections: RwLock<Collections>,
    listeners: Arc<RwLock<HashMap<u64, Listener>>>,
    next_listener_id: AtomicU64,
    deny_writes: AtomicBool,
    update_calls: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            listeners: Arc::new(RwLock::new(HashMap::new())),
            next_listener_id: AtomicU64::new(1),
            deny_writes: AtomicBool::new(false),
            update_calls: AtomicU64::new(0),
        }
    }

    /// Make every subsequent write reject with `PermissionDenied`,
    /// simulating a security-rule rejection or connectivity loss. Reads
    /// and open subscriptions keep working.
    pub fn deny_writes(&self, deny: bool) {
        self.deny_writes.store(deny, Ordering::Relaxed);
    }

    /// Number of currently registered listeners across all collections.
    pub fn active_listener_count(&self) -> usize {
        self.listeners.read().unwrap().len()
    }

    /// Number of `update_fields` calls received so far, including rejected
    /// ones. Lets tests assert exact write behaviour (no-op drops must
    /// issue zero calls, transitions exactly one).
    pub fn update_call_count(&self) -> u64 {
        self.update_calls.load(Ordering::Relaxed)
    }

    /// Terminate every listener on `collection` with a permission error.
    ///
    /// Each affected subscription receives exactly one
    /// [`SubscriptionEvent::Terminated`] and is deregistered; nothing
    /// further is delivered on it.
    pub fn terminate_subscriptions(&self, collection: &str, reason: &str) {
        let mut listeners = self.listeners.write().unwrap();
        let ids: Vec<u64> = listeners
            .iter()
            .filter(|(_, l)| l.collection == collection)
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            if let Some(listener) = listeners.remove(id) {
                let _ = listener.sender.send(SubscriptionEvent::Terminated(
                    StoreError::PermissionDenied(reason.to_string()),
                ));
            }
        }
        tracing::warn!(collection, count = ids.len(), "Terminated subscriptions");
    }

    /// Current matching result set, in creation order.
    fn current_snapshot(&self, collection: &str, filter: &CollectionFilter) -> Vec<Document> {
        let collections = self.collections.read().unwrap();
        let Some(docs) = collections.get(collection) else {
            return Vec::new();
        };
        docs.iter()
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .filter(|doc| filter.matches(doc))
            .collect()
    }

    /// Push a fresh snapshot to every listener on `collection`.
    ///
    /// Listeners whose receive side is gone are dropped; everyone else
    /// gets the complete new result set for their own filter.
    fn notify(&self, collection: &str) {
        let mut dead = Vec::new();
        {
            let listeners = self.listeners.read().unwrap();
            for (id, listener) in listeners.iter().filter(|(_, l)| l.collection == collection) {
                let snapshot = self.current_snapshot(collection, &listener.filter);
                if listener
                    .sender
                    .send(SubscriptionEvent::Snapshot(snapshot))
                    .is_err()
                {
                    dead.push(*id);
                }
            }
        }
        if !dead.is_empty() {
            let mut listeners = self.listeners.write().unwrap();
            for id in dead {
                listeners.remove(&id);
            }
        }
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.deny_writes.load(Ordering::Relaxed) {
            return Err(StoreError::PermissionDenied(
                "writes are denied for this client".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn add(
        &self,
        collection: &str,
        fields: serde_json::Value,
    ) -> Result<EntityId, StoreError> {
        self.check_writable()?;
        let serde_json::Value::Object(mut object) = fields else {
            return Err(StoreError::Validation(
                "document fields must be a JSON object".to_string(),
            ));
        };
        object.insert(FIELD_CREATED_AT.to_string(), json!(chrono::Utc::now()));

        let id = uuid::Uuid::new_v4().to_string();
        self.collections
            .write()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), serde_json::Value::Object(object));

        tracing::debug!(collection, id = %id, "Document added");
        self.notify(collection);
        Ok(id)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: serde_json::Value,
    ) -> Result<(), StoreError> {
        self.update_calls.fetch_add(1, Ordering::Relaxed);
        self.check_writable()?;
        let Some(patch) = fields.as_object() else {
            return Err(StoreError::Validation(
                "update fields must be a JSON object".to_string(),
            ));
        };

        {
            let mut collections = self.collections.write().unwrap();
            let doc = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;
            if let Some(object) = doc.as_object_mut() {
                for (key, value) in patch {
                    object.insert(key.clone(), value.clone());
                }
            }
        }

        tracing::debug!(collection, id, "Document updated");
        self.notify(collection);
        Ok(())
    }

    fn subscribe(&self, collection: &str, filter: CollectionFilter) -> Subscription {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();

        // Deliver the current result set promptly as the first snapshot.
        let _ = sender.send(SubscriptionEvent::Snapshot(
            self.current_snapshot(collection, &filter),
        ));

        self.listeners.write().unwrap().insert(
            id,
            Listener {
                collection: collection.to_string(),
                filter,
                sender,
            },
        );
        tracing::debug!(collection, subscription_id = id, "Listener registered");

        let listeners = Arc::clone(&self.listeners);
        Subscription::new(id, receiver, move || {
            listeners.write().unwrap().remove(&id);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn add_rejects_non_object_fields() {
        let store = MemoryStore::new();
        let result = store.add("tasks", json!("not an object")).await;
        assert_matches!(result, Err(StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn add_stamps_created_at() {
        let store = MemoryStore::new();
        let id = store
            .add("tasks", json!({"ownerId": "u-1", "title": "t"}))
            .await
            .unwrap();

        let snapshot = store.current_snapshot("tasks", &CollectionFilter::owned_by("u-1"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, id);
        assert!(snapshot[0].fields.get(FIELD_CREATED_AT).is_some());
    }

    #[tokio::test]
    async fn update_unknown_document_is_not_found() {
        let store = MemoryStore::new();
        let result = store
            .update_fields("tasks", "missing", json!({"status": "completed"}))
            .await;
        assert_matches!(result, Err(StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn denied_write_leaves_documents_untouched() {
        let store = MemoryStore::new();
        let id = store
            .add("tasks", json!({"ownerId": "u-1", "status": "pending"}))
            .await
            .unwrap();

        store.deny_writes(true);
        let result = store
            .update_fields("tasks", &id, json!({"status": "completed"}))
            .await;
        assert_matches!(result, Err(StoreError::PermissionDenied(_)));

        let snapshot = store.current_snapshot("tasks", &CollectionFilter::owned_by("u-1"));
        assert_eq!(snapshot[0].get_str("status"), Some("pending"));
    }

    #[tokio::test]
    async fn snapshots_preserve_creation_order() {
        let store = MemoryStore::new();
        let first = store
            .add("tasks", json!({"ownerId": "u-1", "title": "a"}))
            .await
            .unwrap();
        let second = store
            .add("tasks", json!({"ownerId": "u-1", "title": "b"}))
            .await
            .unwrap();

        let snapshot = store.current_snapshot("tasks", &CollectionFilter::owned_by("u-1"));
        assert_eq!(snapshot[0].id, first);
        assert_eq!(snapshot[1].id, second);
    }
}
