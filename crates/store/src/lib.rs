//! Kadro entity-store boundary.
//!
//! The durable state of the board subsystem lives in an external managed
//! document database. This crate is the narrow interface to it:
//!
//! - [`EntityStore`] — the subscribe/mutate trait the rest of the
//!   workspace programs against.
//! - [`Document`] / [`CollectionFilter`] — raw documents and tenant-scoped
//!   query filters.
//! - [`Subscription`] — a standing listener delivering complete result-set
//!   snapshots until explicitly torn down.
//! - [`models`] — the typed `Project`/`Task` entities and their create
//!   DTOs.
//! - [`MemoryStore`] — an in-memory implementation with the same snapshot
//!   fan-out semantics, used by tests and local development.

pub mod document;
pub mod error;
pub mod fields;
pub mod filter;
pub mod memory;
pub mod models;
pub mod store;
pub mod subscription;

pub use document::Document;
pub use error::StoreError;
pub use filter::CollectionFilter;
pub use memory::MemoryStore;
pub use store::EntityStore;
pub use subscription::{Detacher, Subscription, SubscriptionEvent};
