//! Whole-board flows against the in-process store: seed, group, drag,
//! checklist, schema-drift fallback, delete.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use focusdeck_core::{
    Applied, DateBucket, EffectSink, MemoryStore, MoveTarget, Priority, StaticIdentity, Subtask,
    TaskDraft, TaskEngine, TaskPatch, TaskStatus, TaskStore,
};

#[derive(Default)]
struct CountingSink {
    celebrations: AtomicUsize,
}

impl EffectSink for CountingSink {
    fn celebrate(&self) {
        self.celebrations.fetch_add(1, Ordering::SeqCst);
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn on(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(9, 0, 0).unwrap())
}

fn draft(title: &str, due: Option<DateTime<Utc>>, priority: Priority) -> TaskDraft {
    TaskDraft {
        due_date: due,
        priority,
        ..TaskDraft::new(title)
    }
}

#[tokio::test]
async fn board_lifecycle_end_to_end() {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(CountingSink::default());
    let mut engine = TaskEngine::new(store.clone(), StaticIdentity::new("owner-1"), sink.clone());

    let overdue = engine
        .create(draft(
            "Pay invoice",
            Some(on(today()) - Duration::days(2)),
            Priority::High,
        ))
        .await
        .unwrap();
    engine
        .create(draft("Standup notes", Some(on(today())), Priority::Low))
        .await
        .unwrap();
    let someday = engine
        .create(draft("Read paper", None, Priority::Medium))
        .await
        .unwrap();

    // Agenda grouping: one per bucket, flattened order stays sorted.
    let groups = engine.grouped(today());
    assert_eq!(groups.overdue.len(), 1);
    assert_eq!(groups.today.len(), 1);
    assert_eq!(groups.no_date.len(), 1);
    assert_eq!(groups.len(), 3);
    assert_eq!(
        groups
            .iter()
            .filter(|(_, tasks)| !tasks.is_empty())
            .map(|(bucket, _)| bucket)
            .collect::<Vec<_>>(),
        vec![DateBucket::Overdue, DateBucket::Today, DateBucket::NoDate]
    );

    // Dragging the overdue task onto tomorrow's calendar cell.
    let tomorrow = on(today()) + Duration::days(1);
    engine
        .move_task(&overdue.id, MoveTarget::DueDate(tomorrow))
        .await
        .unwrap();
    assert_eq!(engine.grouped(today()).tomorrow.len(), 1);
    assert_eq!(store.snapshot().iter().filter(|t| t.due_date == Some(tomorrow)).count(), 1);

    // Dragging into the done column celebrates exactly once.
    engine
        .move_task(&overdue.id, MoveTarget::Status(TaskStatus::Done))
        .await
        .unwrap();
    engine
        .move_task(&overdue.id, MoveTarget::Status(TaskStatus::Done))
        .await
        .unwrap();
    assert_eq!(sink.celebrations.load(Ordering::SeqCst), 1);

    // Checklist: replace, then toggle; the whole array is persisted.
    engine
        .replace_subtasks(
            &someday.id,
            vec![Subtask::new("skim abstract"), Subtask::new("take notes")],
        )
        .await
        .unwrap();
    engine.toggle_subtask(&someday.id, 0).await.unwrap();
    let stored = store
        .snapshot()
        .into_iter()
        .find(|t| t.id == someday.id)
        .unwrap();
    assert_eq!(stored.subtasks.len(), 2);
    assert!(stored.subtasks[0].completed);
    assert!(!stored.subtasks[1].completed);

    // Delete after (caller-side) confirmation.
    engine.delete(&someday.id).await.unwrap();
    assert_eq!(engine.tasks().len(), 2);
    assert_eq!(store.snapshot().len(), 2);
}

#[tokio::test]
async fn reload_is_the_only_resynchronization() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = TaskEngine::new(
        store.clone(),
        StaticIdentity::new("owner-1"),
        focusdeck_core::NullSink,
    );
    let task = engine.create(TaskDraft::new("Draft blog post")).await.unwrap();

    // Another session edits the row remotely.
    let patch = TaskPatch {
        title: Some("Publish blog post".into()),
        ..TaskPatch::default()
    };
    store.update_task(&task.id, "owner-1", &patch).await.unwrap();

    // Until a reload, the local copy is stale.
    assert_eq!(engine.get(&task.id).unwrap().title, "Draft blog post");
    engine.reload().await.unwrap();
    assert_eq!(engine.get(&task.id).unwrap().title, "Publish blog post");
}

#[tokio::test]
async fn drift_fallback_reports_partial_success() {
    let store = Arc::new(MemoryStore::new().with_legacy_schema());
    let mut engine = TaskEngine::new(
        store.clone(),
        StaticIdentity::new("owner-1"),
        focusdeck_core::NullSink,
    );
    let task = engine.create(TaskDraft::new("Legacy row")).await.unwrap();

    let patch = TaskPatch {
        priority: Some(Priority::High),
        category: Some("deep work".into()),
        ..TaskPatch::default()
    };
    let applied = engine.update_details(&task.id, patch).await.unwrap();
    assert!(matches!(applied, Applied::Partial { .. }));

    let stored = store.snapshot();
    assert_eq!(stored[0].priority, Priority::High);
    assert!(stored[0].category.is_none());
}
