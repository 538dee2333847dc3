//! Standing subscriptions against the entity store.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::document::Document;
use crate::error::StoreError;

/// One delivery from a standing subscription.
#[derive(Debug)]
pub enum SubscriptionEvent {
    /// The complete current result set for the subscribed query, in
    /// creation order. Never a delta: each snapshot replaces the previous
    /// one wholesale, so consumers never merge partial updates.
    Snapshot(Vec<Document>),

    /// The subscription failed and will deliver nothing further. The store
    /// does not retry silently; re-subscribing is the consumer's choice.
    Terminated(StoreError),
}

/// Detach hook for a [`Subscription`].
///
/// Cloneable so the owning view can tear the listener down synchronously
/// while a pump task still holds the subscription itself. Detaching twice
/// is a no-op.
#[derive(Clone)]
pub struct Detacher {
    id: u64,
    hook: Arc<Mutex<Option<Box<dyn FnOnce() + Send>>>>,
}

impl Detacher {
    /// Deregister the listener at the store. After this returns, no
    /// further events are delivered.
    pub fn detach(&self) {
        if let Some(hook) = self.hook.lock().unwrap().take() {
            hook();
            tracing::debug!(subscription_id = self.id, "Subscription detached");
        }
    }
}

/// A live listener registered with the entity store.
///
/// The subscription stays open for the lifetime of the owning view and
/// must be torn down when that view goes away, or it leaks and keeps
/// consuming updates. [`unsubscribe`](Subscription::unsubscribe) detaches
/// synchronously; dropping the handle does the same.
pub struct Subscription {
    id: u64,
    events: mpsc::UnboundedReceiver<SubscriptionEvent>,
    detacher: Detacher,
}

impl Subscription {
    /// Build a subscription handle around a delivery channel and a detach
    /// hook. Store implementations call this; consumers only receive it.
    pub fn new(
        id: u64,
        events: mpsc::UnboundedReceiver<SubscriptionEvent>,
        detach: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            id,
            events,
            detacher: Detacher {
                id,
                hook: Arc::new(Mutex::new(Some(Box::new(detach)))),
            },
        }
    }

    /// Listener id assigned by the store. Useful in logs.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// A handle that can detach this subscription from elsewhere, e.g. a
    /// view tearing down while its pump task owns the subscription.
    pub fn detacher(&self) -> Detacher {
        self.detacher.clone()
    }

    /// Await the next delivery. Returns `None` once the subscription has
    /// been detached and the channel drained.
    pub async fn next_event(&mut self) -> Option<SubscriptionEvent> {
        self.events.recv().await
    }

    /// Detach from the store. After this returns, no further events are
    /// delivered.
    pub fn unsubscribe(self) {
        self.detacher.detach();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detacher.detach();
    }
}
