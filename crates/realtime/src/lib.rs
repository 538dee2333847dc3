//! Kadro realtime subscription layer.
//!
//! Sits between the raw entity-store subscriptions and the board UI:
//!
//! - [`CollectionWatcher`] — owns one store subscription for the lifetime
//!   of a view and publishes typed [`CollectionState`]s on a `watch`
//!   channel: `Loading` until the first snapshot, `Ready` with the
//!   complete typed set on every delivery, `Failed` once on a terminal
//!   subscription error.
//! - [`ToastBus`] — broadcast fan-out of user-visible [`Toast`]
//!   notifications.

pub mod toast;
pub mod watcher;

pub use toast::{Toast, ToastBus, ToastKind};
pub use watcher::{CollectionState, CollectionWatcher};
