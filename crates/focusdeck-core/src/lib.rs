//! # Focusdeck Core Library
//!
//! Core business logic for Focusdeck, a personal productivity tool that
//! combines a task board, a date-bucketed agenda, and a pomodoro focus
//! timer. The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Task Engine**: an in-memory, UI-facing task list kept consistent
//!   with a hosted relational store under optimistic concurrency
//! - **Pomodoro Engine**: a tick-driven state machine the caller advances
//!   once per second; persisted wholesale so it survives restarts
//! - **Storage**: SQLite key-value state and TOML configuration
//! - **Store clients**: PostgREST-style REST client plus an in-process
//!   store for tests
//!
//! ## Key Components
//!
//! - [`TaskEngine`]: optimistic board/agenda mutations
//! - [`PomodoroEngine`]: timer state machine
//! - [`TaskStore`]: remote store seam, scoped by `(task_id, owner_id)`
//! - [`EffectSink`]: fire-and-forget presentation side effects

pub mod effects;
pub mod error;
pub mod events;
pub mod identity;
pub mod storage;
pub mod store;
pub mod task;
pub mod timer;

pub use effects::{EffectSink, NullSink};
pub use error::{ConfigError, CoreError, DatabaseError, StoreError, ValidationError};
pub use events::Event;
pub use identity::{IdentityProvider, StaticIdentity};
pub use storage::{Config, Database, PomodoroStore};
pub use store::{MemoryStore, RestStore, TaskStore};
pub use task::board::{group_by_date, sort_tasks, DateBucket, DateGroups};
pub use task::engine::{Applied, MoveTarget, TaskEngine};
pub use task::{Priority, Subtask, Task, TaskDraft, TaskPatch, TaskStatus};
pub use timer::{PomodoroEngine, SoundSlot, SoundSlots, TimerMode};
