//! Remote task store seam.
//!
//! The engine talks to the hosted store through this trait; every write is
//! scoped by `(task_id, owner_id)` -- an id alone never authorizes a
//! mutation. The store's own row-level rules are assumed, not re-validated.

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::StoreError;
use crate::task::{Task, TaskDraft, TaskPatch};

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All of the owner's tasks, newest creation first.
    async fn list_tasks(&self, owner_id: &str) -> Result<Vec<Task>, StoreError>;

    /// Insert a validated draft and return the stored row
    /// (id and timestamps are store-assigned).
    async fn insert_task(&self, owner_id: &str, draft: &TaskDraft) -> Result<Task, StoreError>;

    /// Apply a partial update to one owned task.
    async fn update_task(
        &self,
        task_id: &str,
        owner_id: &str,
        patch: &TaskPatch,
    ) -> Result<(), StoreError>;

    /// Irreversibly delete one owned task.
    async fn delete_task(&self, task_id: &str, owner_id: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: TaskStore + ?Sized> TaskStore for Arc<S> {
    async fn list_tasks(&self, owner_id: &str) -> Result<Vec<Task>, StoreError> {
        (**self).list_tasks(owner_id).await
    }

    async fn insert_task(&self, owner_id: &str, draft: &TaskDraft) -> Result<Task, StoreError> {
        (**self).insert_task(owner_id, draft).await
    }

    async fn update_task(
        &self,
        task_id: &str,
        owner_id: &str,
        patch: &TaskPatch,
    ) -> Result<(), StoreError> {
        (**self).update_task(task_id, owner_id, patch).await
    }

    async fn delete_task(&self, task_id: &str, owner_id: &str) -> Result<(), StoreError> {
        (**self).delete_task(task_id, owner_id).await
    }
}
