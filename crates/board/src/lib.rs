//! Kadro board subsystem.
//!
//! Everything between a delivered snapshot and a persisted status
//! transition:
//!
//! - [`projector`] — pure bucketing of a flat collection into status
//!   columns.
//! - [`drag`] — the pointer-gesture state machine
//!   (down → move → over → release/cancel) with an activation-distance
//!   threshold.
//! - [`committer`] — the single write of the subsystem: one
//!   `update_fields` per cross-column drop, with toast feedback.
//! - [`aggregator`] — reactive recompute of a project's completion
//!   percentage from its task collection.
//! - [`session`] — [`TaskBoard`]/[`ProjectBoard`]: per-view composition of
//!   watcher, drag state, committer, and teardown. Local state is always
//!   the latest snapshot plus the ephemeral gesture overlay — there is no
//!   separate optimistic copy to reconcile.

pub mod aggregator;
pub mod committer;
pub mod drag;
pub mod projector;
pub mod session;

pub use aggregator::ProgressAggregator;
pub use committer::{CommitOutcome, TransitionCommitter};
pub use drag::{DragConfig, DragController, DragOverlay, DropOutcome, DropTarget, TransitionIntent};
pub use projector::{column_counts, project};
pub use session::{BoardPhase, ProjectBoard, TaskBoard};
