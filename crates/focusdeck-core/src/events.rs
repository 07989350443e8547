use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Every timer state change produces an Event.
/// The CLI prints them as JSON; callers use `IntervalCompleted` to trigger
/// the one-shot completion sound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Manual mode switch. Always leaves the timer paused.
    ModeChanged {
        mode: TimerMode,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    /// An interval ran down to zero and the machine auto-continued into
    /// `next`. Carries everything the caller needs to play the right sound.
    IntervalCompleted {
        finished: TimerMode,
        next: TimerMode,
        cycles_completed: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        time_left: u32,
        initial_time: u32,
        is_active: bool,
        cycles_completed: u32,
        at: DateTime<Utc>,
    },
}
