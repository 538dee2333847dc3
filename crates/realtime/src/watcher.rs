//! Typed collection watcher.
//!
//! Bridges one raw store subscription to the board layer: a spawned pump
//! task decodes each document snapshot into the typed model and publishes
//! the complete collection state on a `watch` channel. The watcher owns
//! the subscription for the lifetime of the view and tears it down on
//! [`close`](CollectionWatcher::close) or drop.

use kadro_store::{CollectionFilter, Detacher, EntityStore, Subscription, SubscriptionEvent};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// The consumer-facing state of a watched collection.
///
/// Replaced wholesale on every delivery — there is no merging of partial
/// updates anywhere downstream.
#[derive(Debug, Clone)]
pub enum CollectionState<T> {
    /// Subscription opened, first snapshot not yet delivered. Views show a
    /// loading indicator in this state.
    Loading,

    /// The complete current result set, in creation order.
    Ready(Vec<T>),

    /// The subscription failed and is terminal. The view surfaces the
    /// message once (toast) and may construct a new watcher to
    /// re-subscribe.
    Failed(String),
}

impl<T> CollectionState<T> {
    /// The items if the collection is ready, otherwise an empty slice.
    pub fn items(&self) -> &[T] {
        match self {
            Self::Ready(items) => items,
            _ => &[],
        }
    }
}

/// Owns one store subscription and republishes it as typed states.
pub struct CollectionWatcher<T> {
    state: watch::Receiver<CollectionState<T>>,
    detacher: Detacher,
    cancel: CancellationToken,
}

impl<T> CollectionWatcher<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Open a subscription on `collection` scoped by `filter` and start
    /// the pump task.
    pub fn spawn(store: &dyn EntityStore, collection: &str, filter: CollectionFilter) -> Self {
        let subscription = store.subscribe(collection, filter);
        let detacher = subscription.detacher();
        let cancel = CancellationToken::new();
        let (sender, state) = watch::channel(CollectionState::Loading);

        tokio::spawn(pump(
            subscription,
            sender,
            cancel.clone(),
            collection.to_string(),
        ));

        Self {
            state,
            detacher,
            cancel,
        }
    }

    /// A fresh receiver for the collection state. Receivers are
    /// independent; each sees the latest state and change notifications.
    pub fn state(&self) -> watch::Receiver<CollectionState<T>> {
        self.state.clone()
    }

    /// Tear the watcher down: deregister the store listener synchronously
    /// and stop the pump. Required when the owning view unmounts —
    /// without it the subscription leaks and keeps consuming updates.
    pub fn close(self) {
        // Drop runs the teardown.
    }
}

impl<T> Drop for CollectionWatcher<T> {
    fn drop(&mut self) {
        self.detacher.detach();
        self.cancel.cancel();
    }
}

/// Pump loop: decode snapshots, publish states, stop on terminal error,
/// cancellation, or channel close.
async fn pump<T: DeserializeOwned>(
    mut subscription: Subscription,
    sender: watch::Sender<CollectionState<T>>,
    cancel: CancellationToken,
    collection: String,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(collection = %collection, "Watcher cancelled");
                break;
            }
            event = subscription.next_event() => match event {
                Some(SubscriptionEvent::Snapshot(docs)) => {
                    let mut items = Vec::with_capacity(docs.len());
                    for doc in &docs {
                        match doc.decode::<T>(&collection) {
                            Ok(item) => items.push(item),
                            // Cannot be produced by this subsystem's own
                            // writes; skip rather than kill the stream.
                            Err(e) => tracing::warn!(
                                collection = %collection,
                                id = %doc.id,
                                error = %e,
                                "Skipping undecodable document",
                            ),
                        }
                    }
                    if sender.send(CollectionState::Ready(items)).is_err() {
                        break;
                    }
                }
                Some(SubscriptionEvent::Terminated(err)) => {
                    tracing::error!(
                        collection = %collection,
                        error = %err,
                        "Subscription terminated",
                    );
                    let _ = sender.send(CollectionState::Failed(err.to_string()));
                    break;
                }
                None => break,
            }
        }
    }
}
