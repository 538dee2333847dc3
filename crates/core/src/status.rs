//! Closed status enumerations and the column abstraction.
//!
//! Board columns are a pure function of an entity's status: every status
//! value maps to exactly one column, and the set of columns is the set of
//! enum variants. Nothing in the workspace constructs a status from an
//! unchecked string — deserialization goes through serde against the
//! closed variant list.

use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// A status enumeration whose variants are the columns of a board.
pub trait Column: Copy + Eq + Hash + std::fmt::Debug + 'static {
    /// Every column of the board, in display order. The first entry is the
    /// default status for newly created entities.
    const ALL: &'static [Self];

    /// Column heading shown in the UI and in toast messages.
    fn label(&self) -> &'static str;
}

/// An entity that renders as a card on a board.
///
/// Column membership is a function of [`status`](BoardItem::status) — an
/// item belongs to exactly one column at any instant, never zero, never
/// more than one.
pub trait BoardItem {
    type Status: Column;

    /// Store-assigned id.
    fn id(&self) -> &str;

    /// Display string, used on the card and in toast messages.
    fn title(&self) -> &str;

    /// Current status, i.e. the column the card renders in.
    fn status(&self) -> Self::Status;
}

// ---------------------------------------------------------------------------
// ProjectStatus
// ---------------------------------------------------------------------------

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

impl Column for ProjectStatus {
    const ALL: &'static [Self] = &[
        Self::Planning,
        Self::InProgress,
        Self::OnHold,
        Self::Completed,
        Self::Cancelled,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::InProgress => "In Progress",
            Self::OnHold => "On Hold",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl ProjectStatus {
    /// Wire representation stored in the entity store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in_progress",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Planning
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl Column for TaskStatus {
    const ALL: &'static [Self] = &[Self::Pending, Self::InProgress, Self::Completed];

    fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl TaskStatus {
    /// Wire representation stored in the entity store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// The derived `isCompleted` flag must always agree with this.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

// ---------------------------------------------------------------------------
// TaskPriority
// ---------------------------------------------------------------------------

/// Task priority. Independent axis from status — it never affects column
/// membership or ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
