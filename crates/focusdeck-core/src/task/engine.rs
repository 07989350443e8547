//! The task engine: an in-memory, UI-facing task list kept consistent with
//! the remote store under optimistic concurrency.
//!
//! Mutations apply to the local copy first, then issue one remote call
//! scoped by `(task_id, owner_id)`. A remote failure is returned to the
//! caller but the local copy is NOT rolled back; a full [`reload`] is the
//! only resynchronization mechanism and unconditionally overwrites local
//! state (last full load wins, pending optimistic edits included).
//!
//! [`reload`]: TaskEngine::reload

use chrono::{NaiveDate, Utc};

use super::board::{self, DateGroups};
use super::{Subtask, Task, TaskDraft, TaskPatch, TaskStatus};
use crate::effects::EffectSink;
use crate::error::{CoreError, Result, StoreError, ValidationError};
use crate::identity::IdentityProvider;
use crate::store::TaskStore;

/// Where a drag lands: a board column or a calendar cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveTarget {
    Status(TaskStatus),
    DueDate(chrono::DateTime<Utc>),
}

/// How a mutation landed remotely. `Partial` means the store's schema was
/// behind and only the guaranteed-stable field subset was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Full,
    Partial { warning: String },
}

pub struct TaskEngine<S, I, E> {
    store: S,
    identity: I,
    effects: E,
    tasks: Vec<Task>,
}

impl<S, I, E> TaskEngine<S, I, E>
where
    S: TaskStore,
    I: IdentityProvider,
    E: EffectSink,
{
    pub fn new(store: S, identity: I, effects: E) -> Self {
        Self {
            store,
            identity,
            effects,
            tasks: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Board order: due date ascending, undated last, priority breaking ties.
    pub fn sorted(&self) -> Vec<Task> {
        board::sort_tasks(&self.tasks)
    }

    /// Agenda buckets relative to `today`.
    pub fn grouped(&self, today: NaiveDate) -> DateGroups {
        board::group_by_date(&self.tasks, today)
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Replace the in-memory list wholesale with a freshly fetched
    /// sequence. No merge with pending local edits -- the load always wins.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Fetch the owner's tasks and replace the local list. Returns the
    /// number of tasks loaded.
    pub async fn reload(&mut self) -> Result<usize> {
        let owner = self.owner()?;
        let tasks = self.store.list_tasks(&owner).await?;
        self.replace_all(tasks);
        Ok(self.tasks.len())
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a task. Hard precondition: a resolvable owner.
    pub async fn create(&mut self, draft: TaskDraft) -> Result<Task> {
        let owner = self.owner()?;
        draft.validate()?;
        let task = self.store.insert_task(&owner, &draft).await?;
        // The list is ordered newest-first.
        self.tasks.insert(0, task.clone());
        Ok(task)
    }

    /// Move a task to another column or calendar day.
    ///
    /// Optimistic: the local copy changes immediately, then one remote
    /// update is issued. A move into `done` from any other status fires
    /// the completion side effects exactly once; `done -> done` never does.
    /// Moving to the due day a task already has is a no-op.
    pub async fn move_task(&mut self, task_id: &str, target: MoveTarget) -> Result<Applied> {
        let owner = self.owner()?;
        let index = self.index_of(task_id)?;
        let now = Utc::now();
        let mut patch = TaskPatch {
            updated_at: Some(now),
            ..TaskPatch::default()
        };

        match target {
            MoveTarget::Status(new_status) => {
                let task = &mut self.tasks[index];
                if !task.status.is_done() && new_status.is_done() {
                    self.effects.play_sound("task_complete.mp3");
                    self.effects.celebrate();
                    self.effects.toast_success("Task completed!");
                }
                task.status = new_status;
                task.updated_at = now;
                patch.status = Some(new_status);
            }
            MoveTarget::DueDate(new_due) => {
                let task = &mut self.tasks[index];
                if task.due_date.map(|d| d.date_naive()) == Some(new_due.date_naive()) {
                    return Ok(Applied::Full);
                }
                task.due_date = Some(new_due);
                task.updated_at = now;
                patch.due_date = Some(new_due);
                self.effects.toast_success("Due date updated");
            }
        }

        self.store.update_task(task_id, &owner, &patch).await?;
        Ok(Applied::Full)
    }

    /// Flip one checklist entry, then persist the entire subtask sequence
    /// (there is no partial-subtask remote protocol).
    pub async fn toggle_subtask(&mut self, task_id: &str, index: usize) -> Result<Applied> {
        let owner = self.owner()?;
        let task_index = self.index_of(task_id)?;
        let task = &mut self.tasks[task_index];

        let len = task.subtasks.len();
        let Some(subtask) = task.subtasks.get_mut(index) else {
            return Err(ValidationError::OutOfBounds {
                collection: "subtasks".into(),
                index,
                len,
            }
            .into());
        };
        subtask.completed = !subtask.completed;

        let now = Utc::now();
        task.updated_at = now;
        let patch = TaskPatch {
            subtasks: Some(task.subtasks.clone()),
            updated_at: Some(now),
            ..TaskPatch::default()
        };
        self.store.update_task(task_id, &owner, &patch).await?;
        Ok(Applied::Full)
    }

    /// Replace the whole checklist (add, remove, reorder).
    pub async fn replace_subtasks(
        &mut self,
        task_id: &str,
        subtasks: Vec<Subtask>,
    ) -> Result<Applied> {
        let owner = self.owner()?;
        let patch = TaskPatch {
            subtasks: Some(subtasks),
            updated_at: Some(Utc::now()),
            ..TaskPatch::default()
        };
        patch.validate()?;

        let index = self.index_of(task_id)?;
        patch.apply_to(&mut self.tasks[index]);
        self.store.update_task(task_id, &owner, &patch).await?;
        Ok(Applied::Full)
    }

    /// Edit task details from a partial patch.
    ///
    /// Provided fields are validated against the creation constraints and
    /// applied optimistically. If the store rejects an unrecognized column
    /// (schema drift), the update is resubmitted with only the
    /// guaranteed-stable subset {title, description, status, priority} and
    /// reported as a partial success instead of a hard failure.
    pub async fn update_details(&mut self, task_id: &str, mut patch: TaskPatch) -> Result<Applied> {
        let owner = self.owner()?;
        patch.validate()?;
        patch.updated_at = Some(Utc::now());

        let index = self.index_of(task_id)?;
        let previous_status = self.tasks[index].status;
        patch.apply_to(&mut self.tasks[index]);

        if let Some(new_status) = patch.status {
            if !previous_status.is_done() && new_status.is_done() {
                self.effects.play_sound("task_complete.mp3");
                self.effects.celebrate();
                self.effects.toast_success("Task completed!");
            }
        }

        match self.store.update_task(task_id, &owner, &patch).await {
            Ok(()) => Ok(Applied::Full),
            Err(StoreError::SchemaDrift(message)) if !patch.is_stable_only() => {
                let narrowed = patch.stable_subset();
                self.store.update_task(task_id, &owner, &narrowed).await?;
                Ok(Applied::Partial {
                    warning: format!(
                        "store schema out of date ({message}); extended fields were not saved"
                    ),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Irreversibly delete a task.
    ///
    /// Precondition (caller's responsibility): the user explicitly
    /// confirmed. The engine does not re-ask.
    pub async fn delete(&mut self, task_id: &str) -> Result<()> {
        let owner = self.owner()?;
        // Make sure we know the task before issuing the remote delete.
        self.index_of(task_id)?;
        self.store.delete_task(task_id, &owner).await?;
        self.tasks.retain(|t| t.id != task_id);
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn owner(&self) -> Result<String> {
        self.identity.current_owner().ok_or(CoreError::Authorization)
    }

    fn index_of(&self, task_id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| CoreError::UnknownTask(task_id.to_string()))
    }
}
