//! Durable pomodoro state.
//!
//! The entire engine state is serialized under one fixed key and written
//! back after every mutation, so the timer survives restarts. The store is
//! synchronous and treated as always available; a missing or unreadable
//! value falls back to a fresh engine rather than failing startup.

use super::Database;
use crate::error::DatabaseError;
use crate::timer::PomodoroEngine;

const STATE_KEY: &str = "pomodoro_state";

pub struct PomodoroStore {
    db: Database,
}

impl PomodoroStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Load the persisted engine, or a fresh one when nothing usable is
    /// stored.
    pub fn load(&self) -> PomodoroEngine {
        if let Ok(Some(json)) = self.db.kv_get(STATE_KEY) {
            if let Ok(engine) = serde_json::from_str::<PomodoroEngine>(&json) {
                return engine;
            }
        }
        PomodoroEngine::new()
    }

    /// Persist the engine. Called after every mutation.
    pub fn save(&self, engine: &PomodoroEngine) -> Result<(), DatabaseError> {
        let json = serde_json::to_string(engine)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        self.db.kv_set(STATE_KEY, &json)
    }
}
