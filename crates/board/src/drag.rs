//! Drag-gesture state machine.
//!
//! One controller instance tracks one pointer gesture at a time:
//!
//! ```text
//! Idle --pointer_down--> Pending --pointer_move >= threshold--> Dragging
//! Pending --release--> Idle (plain click)
//! Dragging --release over target--> Idle (no-op or transition intent)
//! Dragging --release without target / cancel--> Idle (discarded)
//! ```
//!
//! The activation-distance threshold disambiguates a drag from a click:
//! below it no drag state is entered and the card's click behaviour
//! proceeds normally. While a drag is active the floating card renders
//! from [`DragController::overlay`], independent of the projected column
//! lists — the lists themselves are never mutated mid-gesture.

use kadro_core::geometry::Point;
use kadro_core::status::Column;
use kadro_core::types::EntityId;

/// Tunables for gesture recognition.
///
/// Injected by the embedding view rather than read from ambient config.
#[derive(Debug, Clone)]
pub struct DragConfig {
    /// Minimum pointer travel, in logical pixels, before a pressed card
    /// becomes a drag.
    pub activation_distance: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            activation_distance: 8.0,
        }
    }
}

/// What the pointer is currently over, drop-wise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget<C> {
    /// Over another card. Implies the column that card currently belongs
    /// to.
    Card { id: EntityId, column: C },

    /// Over a column surface directly — an empty column or the
    /// end-of-list placeholder.
    Column(C),
}

impl<C: Column> DropTarget<C> {
    /// The destination column this target resolves to.
    pub fn column(&self) -> C {
        match self {
            Self::Card { column, .. } => *column,
            Self::Column(column) => *column,
        }
    }
}

/// The floating copy of the dragged card.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOverlay<C> {
    pub entity_id: EntityId,
    pub from: C,
    pub position: Point,
}

/// A cross-column drop, ready for the committer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionIntent<C> {
    pub entity_id: EntityId,
    pub from: C,
    pub to: C,
}

/// How a gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome<C> {
    /// Pointer never travelled past the activation threshold — the press
    /// is a plain click on the card.
    Click(EntityId),

    /// Dropped back into the originating column. Visually supported
    /// during the gesture, never persisted: there is no stored manual
    /// rank, so no write is issued.
    NoOp,

    /// Gesture aborted, or released outside any recognized target.
    /// Silently discarded.
    Cancelled,

    /// Dropped in a different column — exactly one transition intent.
    Transition(TransitionIntent<C>),
}

enum GestureState<C> {
    Idle,
    Pending {
        entity_id: EntityId,
        from: C,
        origin: Point,
    },
    Dragging {
        entity_id: EntityId,
        from: C,
        position: Point,
        over: Option<DropTarget<C>>,
    },
}

/// Stateful per-gesture controller.
pub struct DragController<C> {
    config: DragConfig,
    state: GestureState<C>,
}

impl<C: Column> DragController<C> {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            state: GestureState::Idle,
        }
    }

    /// Whether a drag (past the activation threshold) is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Pointer pressed on a card. Arms a pending gesture; any gesture
    /// already in flight is discarded first.
    pub fn pointer_down(&mut self, entity_id: impl Into<EntityId>, from: C, at: Point) {
        self.state = GestureState::Pending {
            entity_id: entity_id.into(),
            from,
            origin: at,
        };
    }

    /// Pointer moved. Activates the drag once travel from the press
    /// origin reaches the threshold. Returns whether a drag is active
    /// after the move.
    pub fn pointer_move(&mut self, to: Point) -> bool {
        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Idle => false,
            GestureState::Pending {
                entity_id,
                from,
                origin,
            } => {
                if origin.distance_to(to) >= self.config.activation_distance {
                    tracing::trace!(entity_id = %entity_id, "Drag activated");
                    self.state = GestureState::Dragging {
                        entity_id,
                        from,
                        position: to,
                        over: None,
                    };
                    true
                } else {
                    self.state = GestureState::Pending {
                        entity_id,
                        from,
                        origin,
                    };
                    false
                }
            }
            GestureState::Dragging {
                entity_id,
                from,
                over,
                ..
            } => {
                self.state = GestureState::Dragging {
                    entity_id,
                    from,
                    position: to,
                    over,
                };
                true
            }
        }
    }

    /// Update the current drop candidate while dragging. `None` means the
    /// pointer is outside every recognized target. Ignored unless a drag
    /// is active.
    pub fn pointer_over(&mut self, target: Option<DropTarget<C>>) {
        if let GestureState::Dragging { over, .. } = &mut self.state {
            *over = target;
        }
    }

    /// The floating card, while a drag is active.
    pub fn overlay(&self) -> Option<DragOverlay<C>> {
        match &self.state {
            GestureState::Dragging {
                entity_id,
                from,
                position,
                ..
            } => Some(DragOverlay {
                entity_id: entity_id.clone(),
                from: *from,
                position: *position,
            }),
            _ => None,
        }
    }

    /// Pointer released — ends the gesture and resolves the drop.
    pub fn release(&mut self) -> DropOutcome<C> {
        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Idle => DropOutcome::Cancelled,
            GestureState::Pending { entity_id, .. } => DropOutcome::Click(entity_id),
            GestureState::Dragging {
                entity_id,
                from,
                over,
                ..
            } => match over {
                None => DropOutcome::Cancelled,
                Some(target) => {
                    let to = target.column();
                    if to == from {
                        DropOutcome::NoOp
                    } else {
                        DropOutcome::Transition(TransitionIntent {
                            entity_id,
                            from,
                            to,
                        })
                    }
                }
            },
        }
    }

    /// Gesture aborted (escape, pointer capture lost). Always discards
    /// silently.
    pub fn cancel(&mut self) -> DropOutcome<C> {
        self.state = GestureState::Idle;
        DropOutcome::Cancelled
    }
}

impl<C: Column> Default for DragController<C> {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}
