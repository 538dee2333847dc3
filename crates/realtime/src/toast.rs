//! User-visible toast notifications.
//!
//! All entity-store failures in the board subsystem surface as exactly one
//! toast at the point of the call; no structured error codes propagate
//! further up. The bus is the delivery channel between the board layer and
//! whatever UI shell renders the toasts.

use tokio::sync::broadcast;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 64;

/// Visual flavour of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A single notification shown to the user.
#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Broadcast fan-out for toasts.
///
/// Cheaply cloneable; any number of UI listeners can subscribe
/// independently. When the buffer is full the oldest un-consumed toasts
/// are dropped and slow receivers observe `RecvError::Lagged`.
#[derive(Clone)]
pub struct ToastBus {
    sender: broadcast::Sender<Toast>,
}

impl ToastBus {
    /// Create a bus with a specific channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a toast to all current listeners.
    ///
    /// If no listener is attached the toast is silently dropped — feedback
    /// is best-effort and never blocks board work.
    pub fn publish(&self, toast: Toast) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(toast);
    }

    /// Subscribe to all toasts published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }
}

impl Default for ToastBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = ToastBus::default();
        let mut rx = bus.subscribe();

        bus.publish(Toast::success("Task moved to In Progress"));

        let toast = rx.recv().await.expect("should receive the toast");
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, "Task moved to In Progress");
    }

    #[tokio::test]
    async fn multiple_listeners_receive_same_toast() {
        let bus = ToastBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Toast::error("Failed to move task"));

        assert_eq!(rx1.recv().await.unwrap().kind, ToastKind::Error);
        assert_eq!(rx2.recv().await.unwrap().kind, ToastKind::Error);
    }

    #[test]
    fn publish_with_no_listeners_does_not_panic() {
        let bus = ToastBus::default();
        bus.publish(Toast::success("nobody is watching"));
    }
}
