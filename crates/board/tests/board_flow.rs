//! Integration tests for the task board: drag-to-transition flow,
//! progress aggregation, failure convergence, and teardown.
//!
//! All tests drive a `TaskBoard` against a `MemoryStore`, observing
//! persisted truth through short-lived raw subscriptions.

use std::sync::Arc;

use assert_matches::assert_matches;
use kadro_board::{BoardPhase, DragConfig, DropOutcome, TaskBoard};
use kadro_core::geometry::Point;
use kadro_core::status::TaskStatus;
use kadro_core::types::EntityId;
use kadro_realtime::{ToastBus, ToastKind};
use kadro_store::models::CreateTask;
use kadro_store::{CollectionFilter, EntityStore, MemoryStore, SubscriptionEvent};
use serde_json::json;

const OWNER: &str = "u-1";

async fn seed_project(store: &MemoryStore, name: &str) -> EntityId {
    store
        .add(
            "projects",
            json!({
                "ownerId": OWNER,
                "name": name,
                "description": null,
                "status": "planning",
                "progress": 0,
            }),
        )
        .await
        .unwrap()
}

async fn seed_task(store: &MemoryStore, project: &str, title: &str, status: &str) -> EntityId {
    store
        .add(
            "tasks",
            json!({
                "ownerId": OWNER,
                "projectId": project,
                "title": title,
                "description": null,
                "status": status,
                "priority": "medium",
                "isCompleted": status == "completed",
            }),
        )
        .await
        .unwrap()
}

/// Read the persisted progress of the single seeded project.
async fn stored_progress(store: &MemoryStore) -> i64 {
    let mut sub = store.subscribe("projects", CollectionFilter::owned_by(OWNER));
    match sub.next_event().await {
        Some(SubscriptionEvent::Snapshot(docs)) => docs[0]
            .fields
            .get("progress")
            .and_then(|v| v.as_i64())
            .expect("progress field"),
        other => panic!("expected snapshot, got {other:?}"),
    }
}

fn open_board(store: &Arc<MemoryStore>, project_id: &str, toasts: &ToastBus) -> TaskBoard {
    TaskBoard::open(
        Arc::clone(store) as Arc<dyn EntityStore>,
        OWNER,
        project_id,
        Some(0),
        toasts.clone(),
        DragConfig::default(),
    )
}

/// Drag a card from its current position onto a column surface.
async fn drag_to_column(
    board: &mut TaskBoard,
    task_id: &str,
    column: TaskStatus,
) -> DropOutcome<TaskStatus> {
    board.pointer_down(task_id, Point::new(0.0, 0.0));
    board.pointer_move(Point::new(60.0, 0.0));
    board.pointer_over_column(column);
    board.release().await
}

// ---------------------------------------------------------------------------
// Test: board opens in the loading phase and becomes ready on the first
// snapshot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn board_loads_then_renders_snapshot() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store, "Website relaunch").await;
    seed_task(&store, &project, "Draft copy", "pending").await;

    let toasts = ToastBus::default();
    let mut board = open_board(&store, &project, &toasts);
    assert_eq!(board.phase(), BoardPhase::Loading);

    assert!(board.pump().await);
    assert_eq!(board.phase(), BoardPhase::Ready);
    assert_eq!(board.tasks().len(), 1);

    let columns = board.columns();
    assert_eq!(columns[&TaskStatus::Pending].len(), 1);
    assert!(columns[&TaskStatus::InProgress].is_empty());

    board.close();
}

// ---------------------------------------------------------------------------
// Test: a same-column drop never writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn same_column_drop_issues_no_write() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store, "CRM rollout").await;
    let t1 = seed_task(&store, &project, "Import contacts", "pending").await;
    let t2 = seed_task(&store, &project, "Map fields", "pending").await;

    let toasts = ToastBus::default();
    let mut board = open_board(&store, &project, &toasts);
    board.pump().await;
    assert_eq!(store.update_call_count(), 0);

    // Drop onto a sibling card in the same column.
    board.pointer_down(&t1, Point::new(0.0, 0.0));
    board.pointer_move(Point::new(0.0, 40.0));
    board.pointer_over_card(&t2);
    let outcome = board.release().await;

    assert_eq!(outcome, DropOutcome::NoOp);
    assert_eq!(store.update_call_count(), 0);
    board.close();
}

// ---------------------------------------------------------------------------
// Test: a cross-column drop commits exactly one write
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cross_column_drop_commits_exactly_one_write() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store, "CRM rollout").await;
    let t1 = seed_task(&store, &project, "Import contacts", "pending").await;

    let toasts = ToastBus::default();
    let mut toast_rx = toasts.subscribe();
    let mut board = open_board(&store, &project, &toasts);
    board.pump().await;

    let outcome = drag_to_column(&mut board, &t1, TaskStatus::InProgress).await;
    assert_matches!(outcome, DropOutcome::Transition(intent) => {
        assert_eq!(intent.from, TaskStatus::Pending);
        assert_eq!(intent.to, TaskStatus::InProgress);
    });
    assert_eq!(store.update_call_count(), 1);

    // Success toast names the task and the destination column.
    let toast = toast_rx.try_recv().expect("success toast");
    assert_eq!(toast.kind, ToastKind::Success);
    assert!(toast.message.contains("Import contacts"));
    assert!(toast.message.contains("In Progress"));

    // The next snapshot closes the loop: the card renders in the new
    // column.
    board.pump().await;
    let columns = board.columns();
    assert!(columns[&TaskStatus::Pending].is_empty());
    assert_eq!(columns[&TaskStatus::InProgress][0].id, t1);
    board.close();
}

// ---------------------------------------------------------------------------
// Test: completing a task keeps isCompleted consistent with status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn completing_a_task_keeps_is_completed_consistent() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store, "HR onboarding").await;
    let t1 = seed_task(&store, &project, "Sign contract", "pending").await;

    let toasts = ToastBus::default();
    let mut board = open_board(&store, &project, &toasts);
    board.pump().await;

    drag_to_column(&mut board, &t1, TaskStatus::Completed).await;
    board.pump().await;

    let task = &board.tasks()[0];
    assert_eq!(task.status, TaskStatus::Completed);
    assert!(task.is_completed);
    board.close();
}

// ---------------------------------------------------------------------------
// Test: a rejected transition converges back to store truth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_transition_converges_to_store_truth() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store, "Marketing site").await;
    let t1 = seed_task(&store, &project, "Hero section", "pending").await;

    let toasts = ToastBus::default();
    let mut toast_rx = toasts.subscribe();
    let mut board = open_board(&store, &project, &toasts);
    board.pump().await;

    store.deny_writes(true);
    let outcome = drag_to_column(&mut board, &t1, TaskStatus::InProgress).await;
    assert_matches!(outcome, DropOutcome::Transition(_));

    // The write was attempted once, rejected, surfaced as an error toast,
    // and not retried.
    assert_eq!(store.update_call_count(), 1);
    let toast = toast_rx.try_recv().expect("error toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.contains("Hero section"));

    // The next delivered snapshot still shows the original column, and
    // local state agrees with it.
    store.deny_writes(false);
    seed_task(&store, &project, "Footer", "pending").await;
    board.pump().await;

    let columns = board.columns();
    let pending: Vec<&str> = columns[&TaskStatus::Pending]
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(pending, vec!["Hero section", "Footer"]);
    assert!(columns[&TaskStatus::InProgress].is_empty());
    board.close();
}

// ---------------------------------------------------------------------------
// Test: end-to-end progress aggregation (33 -> 67)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn progress_recomputes_on_task_changes() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store, "Invoicing").await;
    let t1 = seed_task(&store, &project, "Set up templates", "pending").await;
    seed_task(&store, &project, "Tax rates", "pending").await;
    seed_task(&store, &project, "Numbering scheme", "completed").await;

    let toasts = ToastBus::default();
    let mut board = open_board(&store, &project, &toasts);

    // First snapshot: 1 of 3 completed -> 33, persisted.
    board.pump().await;
    assert_eq!(stored_progress(&store).await, 33);

    // Completing one more task recomputes to 67.
    drag_to_column(&mut board, &t1, TaskStatus::Completed).await;
    board.pump().await;
    assert_eq!(stored_progress(&store).await, 67);
    board.close();
}

// ---------------------------------------------------------------------------
// Test: the manual slider writes through, the next task change wins
// ---------------------------------------------------------------------------

#[tokio::test]
async fn manual_progress_is_overwritten_by_next_recompute() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store, "AI assistants").await;
    seed_task(&store, &project, "Prompt review", "pending").await;

    let toasts = ToastBus::default();
    let mut board = open_board(&store, &project, &toasts);
    board.pump().await;
    assert_eq!(stored_progress(&store).await, 0);

    board.set_progress(80).await;
    assert_eq!(stored_progress(&store).await, 80);

    // Any task-set change recomputes from tasks and overwrites the
    // manual value.
    seed_task(&store, &project, "Eval harness", "pending").await;
    board.pump().await;
    assert_eq!(stored_progress(&store).await, 0);
    board.close();
}

// ---------------------------------------------------------------------------
// Test: task creation defaults to the first column
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_task_lands_in_first_column() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store, "Projects").await;

    let toasts = ToastBus::default();
    let mut board = open_board(&store, &project, &toasts);
    board.pump().await;

    let id = board
        .add_task(CreateTask {
            title: "Kickoff meeting".into(),
            description: None,
            project_id: None,
            priority: None,
        })
        .await
        .expect("task created");

    board.pump().await;
    let columns = board.columns();
    assert_eq!(columns[&TaskStatus::Pending][0].id, id);
    assert!(!columns[&TaskStatus::Pending][0].is_completed);
    board.close();
}

// ---------------------------------------------------------------------------
// Test: invalid task input surfaces a toast and writes nothing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_task_input_is_toasted_not_written() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store, "Projects").await;

    let toasts = ToastBus::default();
    let mut toast_rx = toasts.subscribe();
    let mut board = open_board(&store, &project, &toasts);
    board.pump().await;

    let result = board
        .add_task(CreateTask {
            title: String::new(),
            description: None,
            project_id: None,
            priority: None,
        })
        .await;

    assert!(result.is_none());
    assert_eq!(toast_rx.try_recv().expect("toast").kind, ToastKind::Error);
    assert!(board.tasks().is_empty());
    board.close();
}

// ---------------------------------------------------------------------------
// Test: a terminal subscription failure surfaces once, then the board is
// done
// ---------------------------------------------------------------------------

#[tokio::test]
async fn subscription_failure_fails_the_board_once() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store, "Projects").await;

    let toasts = ToastBus::default();
    let mut toast_rx = toasts.subscribe();
    let mut board = open_board(&store, &project, &toasts);
    board.pump().await;

    store.terminate_subscriptions("tasks", "missing or insufficient permissions");

    assert!(board.pump().await);
    assert_eq!(board.phase(), BoardPhase::Failed);
    assert_eq!(toast_rx.try_recv().expect("toast").kind, ToastKind::Error);

    // Nothing further arrives.
    assert!(!board.pump().await);
    board.close();
}

// ---------------------------------------------------------------------------
// Test: closing the board detaches its subscription
// ---------------------------------------------------------------------------

#[tokio::test]
async fn closing_the_board_detaches_its_subscription() {
    let store = Arc::new(MemoryStore::new());
    let project = seed_project(&store, "Projects").await;

    let toasts = ToastBus::default();
    let mut board = open_board(&store, &project, &toasts);
    board.pump().await;
    assert_eq!(store.active_listener_count(), 1);

    board.close();
    assert_eq!(store.active_listener_count(), 0);
}
