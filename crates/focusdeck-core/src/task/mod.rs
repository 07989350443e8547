//! Task types: the board entity, creation drafts, and partial patches.

pub mod board;
pub mod engine;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 100;
/// Maximum category label length in characters.
pub const CATEGORY_MAX: usize = 30;

/// The fixed card color palette. `color` on a task, when present, must be
/// one of these names.
pub const CARD_COLORS: [&str; 6] = ["default", "red", "blue", "green", "purple", "orange"];

/// Board column a task lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::Doing => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

/// Task priority. Sorting weighs high over medium over low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight: high 3, medium 2, low 1.
    pub fn weight(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// One checklist entry. Insertion order is significant; ids are unique
/// within their task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
        }
    }
}

/// One unit of work, exclusively owned by one user. The remote store's
/// row-level rules enforce that ownership; this side only promises to pass
/// the owner id on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    /// Wire name matches the store's `tasks.user_id` column.
    #[serde(rename = "user_id")]
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a task. Validated locally before the remote insert.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Check the draft against the creation constraints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        validate_subtasks(&self.subtasks)
    }
}

/// A partial update. `None` fields are omitted from the wire body, so the
/// store only touches what was provided.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Subtask>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Provided fields must satisfy the same constraints as creation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        if let Some(subtasks) = &self.subtasks {
            validate_subtasks(subtasks)?;
        }
        Ok(())
    }

    /// The guaranteed-stable column subset, used for the narrowed retry
    /// after a schema-drift rejection. Extended columns (due date, category,
    /// color, subtasks) are dropped.
    pub fn stable_subset(&self) -> TaskPatch {
        TaskPatch {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            updated_at: self.updated_at,
            ..TaskPatch::default()
        }
    }

    /// True when the patch only carries stable-subset fields.
    pub fn is_stable_only(&self) -> bool {
        self.due_date.is_none()
            && self.category.is_none()
            && self.color.is_none()
            && self.subtasks.is_none()
    }

    /// Apply the provided fields to an in-memory task (the optimistic copy).
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(category) = &self.category {
            task.category = Some(category.clone());
        }
        if let Some(color) = &self.color {
            task.color = Some(color.clone());
        }
        if let Some(subtasks) = &self.subtasks {
            task.subtasks = subtasks.clone();
        }
        if let Some(updated_at) = self.updated_at {
            task.updated_at = updated_at;
        }
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if len == 0 {
        return Err(ValidationError::invalid("title", "title is required"));
    }
    if len > TITLE_MAX {
        return Err(ValidationError::invalid(
            "title",
            format!("at most {TITLE_MAX} characters"),
        ));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<(), ValidationError> {
    if category.chars().count() > CATEGORY_MAX {
        return Err(ValidationError::invalid(
            "category",
            format!("at most {CATEGORY_MAX} characters"),
        ));
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<(), ValidationError> {
    if !CARD_COLORS.contains(&color) {
        return Err(ValidationError::invalid(
            "color",
            format!("'{color}' is not in the card palette"),
        ));
    }
    Ok(())
}

fn validate_subtasks(subtasks: &[Subtask]) -> Result<(), ValidationError> {
    let mut seen = std::collections::HashSet::new();
    for subtask in subtasks {
        if !seen.insert(subtask.id.as_str()) {
            return Err(ValidationError::invalid(
                "subtasks",
                format!("duplicate subtask id '{}'", subtask.id),
            ));
        }
    }
    Ok(())
}
