//! In-process task store.
//!
//! Mirrors the hosted store's contract closely enough to develop and test
//! against: rows are scoped by owner, ids and timestamps are store-assigned,
//! and an optional "legacy schema" mode rejects the extended columns the
//! way a store with unapplied migrations does.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

use super::TaskStore;
use crate::error::StoreError;
use crate::task::{Task, TaskDraft, TaskPatch};

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<String, Task>>,
    /// When set, inserts/updates carrying extended columns are rejected
    /// with a schema-drift error, like a store whose migration for
    /// category/color/subtasks never ran.
    legacy_schema: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_legacy_schema(mut self) -> Self {
        self.legacy_schema = true;
        self
    }

    /// All rows, newest creation first (for assertions).
    pub fn snapshot(&self) -> Vec<Task> {
        let mut rows: Vec<Task> = self.lock().values().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Task>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn drift(column: &str) -> StoreError {
        StoreError::SchemaDrift(format!(
            "Could not find the '{column}' column of 'tasks' in the schema cache"
        ))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, owner_id: &str) -> Result<Vec<Task>, StoreError> {
        let mut rows: Vec<Task> = self
            .lock()
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_task(&self, owner_id: &str, draft: &TaskDraft) -> Result<Task, StoreError> {
        if self.legacy_schema {
            if draft.category.is_some() {
                return Err(Self::drift("category"));
            }
            if draft.color.is_some() {
                return Err(Self::drift("color"));
            }
            if !draft.subtasks.is_empty() {
                return Err(Self::drift("subtasks"));
            }
        }

        let now = Utc::now();
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status,
            priority: draft.priority,
            due_date: draft.due_date,
            category: draft.category.clone(),
            color: draft.color.clone(),
            subtasks: draft.subtasks.clone(),
            created_at: now,
            updated_at: now,
        };
        self.lock().insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        task_id: &str,
        owner_id: &str,
        patch: &TaskPatch,
    ) -> Result<(), StoreError> {
        if self.legacy_schema {
            if patch.category.is_some() {
                return Err(Self::drift("category"));
            }
            if patch.color.is_some() {
                return Err(Self::drift("color"));
            }
            if patch.subtasks.is_some() {
                return Err(Self::drift("subtasks"));
            }
        }

        let mut rows = self.lock();
        // Row-level scoping: a non-matching (id, owner) pair simply
        // matches zero rows, like the real store's filters.
        if let Some(task) = rows
            .get_mut(task_id)
            .filter(|t| t.owner_id == owner_id)
        {
            patch.apply_to(task);
        }
        Ok(())
    }

    async fn delete_task(&self, task_id: &str, owner_id: &str) -> Result<(), StoreError> {
        let mut rows = self.lock();
        let owned = rows
            .get(task_id)
            .map(|t| t.owner_id == owner_id)
            .unwrap_or(false);
        if owned {
            rows.remove(task_id);
        }
        Ok(())
    }
}
