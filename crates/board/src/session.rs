//! Per-view board sessions.
//!
//! A session owns everything a mounted board view needs: the collection
//! watcher, the latest snapshot, the drag controller, the committer, and
//! (for task boards) the progress aggregator. Local state is purely the
//! latest authoritative snapshot plus the ephemeral gesture overlay —
//! there is no separate optimistic copy, so there is nothing to
//! reconcile after a failed write beyond waiting for the next snapshot.
//!
//! Sessions must be [`close`](TaskBoard::close)d when the view unmounts;
//! teardown detaches the store listener synchronously. In-flight writes
//! are not cancelled — they are fire-and-forget.

use std::sync::Arc;

use indexmap::IndexMap;
use kadro_core::geometry::Point;
use kadro_core::status::{Column, ProjectStatus, TaskStatus};
use kadro_core::types::{EntityId, OwnerId};
use kadro_realtime::{CollectionState, CollectionWatcher, Toast, ToastBus};
use kadro_store::fields::{COLLECTION_PROJECTS, COLLECTION_TASKS};
use kadro_store::models::{CreateProject, CreateTask, Project, Task};
use kadro_store::{CollectionFilter, EntityStore};
use tokio::sync::watch;

use crate::aggregator::ProgressAggregator;
use crate::committer::TransitionCommitter;
use crate::drag::{DragConfig, DragController, DragOverlay, DropOutcome, DropTarget};
use crate::projector;

/// Render phase of a board view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    /// Subscription open, first snapshot not yet delivered — the view
    /// shows a loading indicator.
    Loading,
    /// Rendering the latest snapshot.
    Ready,
    /// The subscription failed terminally. The view may open a fresh
    /// session to re-subscribe.
    Failed,
}

// ---------------------------------------------------------------------------
// TaskBoard
// ---------------------------------------------------------------------------

/// The Kanban board over one project's tasks.
pub struct TaskBoard {
    store: Arc<dyn EntityStore>,
    owner_id: OwnerId,
    project_id: EntityId,
    watcher: CollectionWatcher<Task>,
    state: watch::Receiver<CollectionState<Task>>,
    drag: DragController<TaskStatus>,
    committer: TransitionCommitter,
    aggregator: ProgressAggregator,
    toasts: ToastBus,
    tasks: Vec<Task>,
    phase: BoardPhase,
}

impl TaskBoard {
    /// Open the board: subscribe to the project's tasks and start in the
    /// loading phase.
    ///
    /// `stored_progress` seeds the aggregator with the progress value the
    /// project document carried when the view opened, so an unchanged
    /// task set does not trigger a spurious write.
    pub fn open(
        store: Arc<dyn EntityStore>,
        owner_id: impl Into<OwnerId>,
        project_id: impl Into<EntityId>,
        stored_progress: Option<u8>,
        toasts: ToastBus,
        drag_config: DragConfig,
    ) -> Self {
        let owner_id = owner_id.into();
        let project_id = project_id.into();
        let filter =
            CollectionFilter::owned_by(owner_id.clone()).with_project(project_id.clone());
        let watcher = CollectionWatcher::spawn(store.as_ref(), COLLECTION_TASKS, filter);
        let state = watcher.state();
        tracing::info!(owner_id = %owner_id, project_id = %project_id, "Task board opened");

        Self {
            committer: TransitionCommitter::new(Arc::clone(&store), toasts.clone()),
            aggregator: ProgressAggregator::new(
                Arc::clone(&store),
                project_id.clone(),
                stored_progress,
            ),
            drag: DragController::new(drag_config),
            store,
            owner_id,
            project_id,
            watcher,
            state,
            toasts,
            tasks: Vec::new(),
            phase: BoardPhase::Loading,
        }
    }

    /// Await and apply the next collection change.
    ///
    /// Applies the snapshot, runs the progress aggregator, and surfaces a
    /// terminal subscription failure as one error toast. Returns `false`
    /// once no further changes will arrive (teardown or terminal
    /// failure).
    pub async fn pump(&mut self) -> bool {
        if self.state.changed().await.is_err() {
            return false;
        }
        let snapshot = self.state.borrow_and_update().clone();
        match snapshot {
            CollectionState::Loading => {}
            CollectionState::Ready(tasks) => {
                self.tasks = tasks;
                self.phase = BoardPhase::Ready;
                self.aggregator.reconcile(&self.tasks).await;
            }
            CollectionState::Failed(message) => {
                self.phase = BoardPhase::Failed;
                self.toasts
                    .publish(Toast::error(format!("Tasks are unavailable: {message}")));
            }
        }
        true
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    /// Latest authoritative snapshot, in creation order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The board columns, derived fresh from the latest snapshot.
    pub fn columns(&self) -> IndexMap<TaskStatus, Vec<Task>> {
        projector::project(&self.tasks, TaskStatus::ALL)
    }

    /// The floating card while a drag is active.
    pub fn overlay(&self) -> Option<DragOverlay<TaskStatus>> {
        self.drag.overlay()
    }

    // -- drag gesture ------------------------------------------------------

    /// Pointer pressed on a card. Ignored for ids not in the snapshot
    /// (stale render).
    pub fn pointer_down(&mut self, task_id: &str, at: Point) {
        if let Some(task) = self.find_task(task_id) {
            let (id, status) = (task.id.clone(), task.status);
            self.drag.pointer_down(id, status, at);
        }
    }

    /// Pointer moved; returns whether a drag is active after the move.
    pub fn pointer_move(&mut self, to: Point) -> bool {
        self.drag.pointer_move(to)
    }

    /// Pointer entered another card. Resolves to that card's current
    /// column; a card that vanished from the snapshot counts as no
    /// target.
    pub fn pointer_over_card(&mut self, task_id: &str) {
        let target = self.find_task(task_id).map(|t| DropTarget::Card {
            id: t.id.clone(),
            column: t.status,
        });
        self.drag.pointer_over(target);
    }

    /// Pointer entered a column surface (empty column or end-of-list).
    pub fn pointer_over_column(&mut self, column: TaskStatus) {
        self.drag.pointer_over(Some(DropTarget::Column(column)));
    }

    /// Pointer left every recognized drop target.
    pub fn pointer_leave(&mut self) {
        self.drag.pointer_over(None);
    }

    /// Abort the gesture (escape, pointer capture lost). Silent.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Pointer released: resolve the drop and, for a cross-column drop,
    /// commit exactly one transition write.
    pub async fn release(&mut self) -> DropOutcome<TaskStatus> {
        match self.drag.release() {
            DropOutcome::Transition(intent) => {
                let Some(title) = self
                    .find_task(&intent.entity_id)
                    .map(|t| t.title.clone())
                else {
                    // The card left the snapshot mid-gesture (remote
                    // change); treat like a drop outside any target.
                    tracing::warn!(
                        task_id = %intent.entity_id,
                        "Dragged task no longer in snapshot, discarding drop",
                    );
                    return DropOutcome::Cancelled;
                };
                self.committer.commit_task(&intent, &title).await;
                DropOutcome::Transition(intent)
            }
            other => other,
        }
    }

    // -- mutations off the board -------------------------------------------

    /// Create a task on this board from the "new task" form. New tasks
    /// start in the first column. Failures surface as a toast.
    pub async fn add_task(&self, input: CreateTask) -> Option<EntityId> {
        let input = CreateTask {
            project_id: Some(self.project_id.clone()),
            ..input
        };
        let fields = match input.into_fields(&self.owner_id) {
            Ok(fields) => fields,
            Err(e) => {
                self.toasts
                    .publish(Toast::error(format!("Couldn't create task: {e}")));
                return None;
            }
        };
        match self.store.add(COLLECTION_TASKS, fields).await {
            Ok(id) => {
                tracing::info!(task_id = %id, project_id = %self.project_id, "Task created");
                Some(id)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create task");
                self.toasts.publish(Toast::error("Failed to create task"));
                None
            }
        }
    }

    /// Manual progress slider. The written value stands until the next
    /// task-set change recomputes it.
    pub async fn set_progress(&mut self, percent: u8) {
        if let Err(e) = self.aggregator.override_progress(percent).await {
            tracing::error!(project_id = %self.project_id, error = %e, "Failed to set progress");
            self.toasts
                .publish(Toast::error("Failed to update project progress"));
        }
    }

    /// Tear the view down: detach the task subscription synchronously.
    pub fn close(self) {
        self.watcher.close();
        tracing::info!(project_id = %self.project_id, "Task board closed");
    }

    fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

// ---------------------------------------------------------------------------
// ProjectBoard
// ---------------------------------------------------------------------------

/// The Kanban board over all of an owner's projects.
pub struct ProjectBoard {
    store: Arc<dyn EntityStore>,
    owner_id: OwnerId,
    watcher: CollectionWatcher<Project>,
    state: watch::Receiver<CollectionState<Project>>,
    drag: DragController<ProjectStatus>,
    committer: TransitionCommitter,
    toasts: ToastBus,
    projects: Vec<Project>,
    phase: BoardPhase,
}

impl ProjectBoard {
    /// Open the board: subscribe to the owner's projects and start in the
    /// loading phase.
    pub fn open(
        store: Arc<dyn EntityStore>,
        owner_id: impl Into<OwnerId>,
        toasts: ToastBus,
        drag_config: DragConfig,
    ) -> Self {
        let owner_id = owner_id.into();
        let filter = CollectionFilter::owned_by(owner_id.clone());
        let watcher = CollectionWatcher::spawn(store.as_ref(), COLLECTION_PROJECTS, filter);
        let state = watcher.state();
        tracing::info!(owner_id = %owner_id, "Project board opened");

        Self {
            committer: TransitionCommitter::new(Arc::clone(&store), toasts.clone()),
            drag: DragController::new(drag_config),
            store,
            owner_id,
            watcher,
            state,
            toasts,
            projects: Vec::new(),
            phase: BoardPhase::Loading,
        }
    }

    /// Await and apply the next collection change. Returns `false` once
    /// no further changes will arrive.
    pub async fn pump(&mut self) -> bool {
        if self.state.changed().await.is_err() {
            return false;
        }
        let snapshot = self.state.borrow_and_update().clone();
        match snapshot {
            CollectionState::Loading => {}
            CollectionState::Ready(projects) => {
                self.projects = projects;
                self.phase = BoardPhase::Ready;
            }
            CollectionState::Failed(message) => {
                self.phase = BoardPhase::Failed;
                self.toasts
                    .publish(Toast::error(format!("Projects are unavailable: {message}")));
            }
        }
        true
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    /// Latest authoritative snapshot, in creation order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// The board columns, derived fresh from the latest snapshot.
    pub fn columns(&self) -> IndexMap<ProjectStatus, Vec<Project>> {
        projector::project(&self.projects, ProjectStatus::ALL)
    }

    /// The floating card while a drag is active.
    pub fn overlay(&self) -> Option<DragOverlay<ProjectStatus>> {
        self.drag.overlay()
    }

    // -- drag gesture ------------------------------------------------------

    /// Pointer pressed on a card. Ignored for ids not in the snapshot.
    pub fn pointer_down(&mut self, project_id: &str, at: Point) {
        if let Some(project) = self.find_project(project_id) {
            let (id, status) = (project.id.clone(), project.status);
            self.drag.pointer_down(id, status, at);
        }
    }

    /// Pointer moved; returns whether a drag is active after the move.
    pub fn pointer_move(&mut self, to: Point) -> bool {
        self.drag.pointer_move(to)
    }

    /// Pointer entered another card.
    pub fn pointer_over_card(&mut self, project_id: &str) {
        let target = self.find_project(project_id).map(|p| DropTarget::Card {
            id: p.id.clone(),
            column: p.status,
        });
        self.drag.pointer_over(target);
    }

    /// Pointer entered a column surface.
    pub fn pointer_over_column(&mut self, column: ProjectStatus) {
        self.drag.pointer_over(Some(DropTarget::Column(column)));
    }

    /// Pointer left every recognized drop target.
    pub fn pointer_leave(&mut self) {
        self.drag.pointer_over(None);
    }

    /// Abort the gesture. Silent.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Pointer released: resolve the drop and, for a cross-column drop,
    /// commit exactly one transition write.
    pub async fn release(&mut self) -> DropOutcome<ProjectStatus> {
        match self.drag.release() {
            DropOutcome::Transition(intent) => {
                let Some(name) = self
                    .find_project(&intent.entity_id)
                    .map(|p| p.name.clone())
                else {
                    tracing::warn!(
                        project_id = %intent.entity_id,
                        "Dragged project no longer in snapshot, discarding drop",
                    );
                    return DropOutcome::Cancelled;
                };
                self.committer.commit_project(&intent, &name).await;
                DropOutcome::Transition(intent)
            }
            other => other,
        }
    }

    /// Create a project from the "new project" form. New projects start
    /// in the first column with zero progress. Failures surface as a
    /// toast.
    pub async fn add_project(&self, input: CreateProject) -> Option<EntityId> {
        let fields = match input.into_fields(&self.owner_id) {
            Ok(fields) => fields,
            Err(e) => {
                self.toasts
                    .publish(Toast::error(format!("Couldn't create project: {e}")));
                return None;
            }
        };
        match self.store.add(COLLECTION_PROJECTS, fields).await {
            Ok(id) => {
                tracing::info!(project_id = %id, "Project created");
                Some(id)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create project");
                self.toasts.publish(Toast::error("Failed to create project"));
                None
            }
        }
    }

    /// Tear the view down: detach the project subscription synchronously.
    pub fn close(self) {
        self.watcher.close();
        tracing::info!(owner_id = %self.owner_id, "Project board closed");
    }

    fn find_project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}
