//! Pomodoro timer: modes, fixed durations, and the tick-driven engine.

mod engine;

pub use engine::{PomodoroEngine, SoundSlot, SoundSlots};

use serde::{Deserialize, Serialize};

/// Focus interval duration in seconds.
pub const FOCUS_SECS: u32 = 25 * 60;
/// Short break duration in seconds.
pub const SHORT_BREAK_SECS: u32 = 5 * 60;
/// Long break duration in seconds.
pub const LONG_BREAK_SECS: u32 = 15 * 60;
/// A long break is scheduled after every this many completed focus intervals.
pub const LONG_BREAK_EVERY: u32 = 3;

/// The three timer modes. Durations are fixed -- there is no invalid-state
/// path through the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    /// Nominal duration of this mode in seconds.
    pub fn duration_secs(&self) -> u32 {
        match self {
            TimerMode::Focus => FOCUS_SECS,
            TimerMode::ShortBreak => SHORT_BREAK_SECS,
            TimerMode::LongBreak => LONG_BREAK_SECS,
        }
    }

    pub fn is_focus(&self) -> bool {
        matches!(self, TimerMode::Focus)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}
