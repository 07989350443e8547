//! Pomodoro engine implementation.
//!
//! The engine is a tick-based state machine. It does not use internal
//! threads or wall-clock reads - the caller owns a one-second driver and
//! calls `tick()` once per elapsed second while the timer is active.
//!
//! ## Mode transitions
//!
//! ```text
//! focus ──(interval completes)──> shortBreak | longBreak ──> focus ──> ...
//! ```
//!
//! Completing a focus interval counts one cycle; every third cycle earns a
//! long break. Interval completion auto-continues: the next mode starts
//! running immediately, no manual resume required.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PomodoroEngine::new();
//! engine.start();
//! // Once per second:
//! if let Some(Event::IntervalCompleted { next, .. }) = engine.tick() {
//!     play(engine.completion_sound(next));
//! }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{TimerMode, LONG_BREAK_EVERY};
use crate::events::Event;

/// The two configurable completion-sound slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundSlot {
    FocusFinished,
    BreakFinished,
}

/// Sound resource references, one per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundSlots {
    pub focus_finished: String,
    pub break_finished: String,
}

impl Default for SoundSlots {
    fn default() -> Self {
        Self {
            focus_finished: "alarm-digital.mp3".into(),
            break_finished: "alarm-whistle-bird.mp3".into(),
        }
    }
}

/// Core pomodoro state machine.
///
/// Serialized wholesale for persistence; the durable store keeps the entire
/// state under one fixed key and is written back after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroEngine {
    mode: TimerMode,
    /// Remaining seconds in the current interval. Never exceeds `initial_time`.
    time_left: u32,
    /// Duration of the current mode at last (re)start.
    initial_time: u32,
    is_active: bool,
    /// Completed focus intervals only; breaks never count.
    cycles_completed: u32,
    #[serde(default)]
    sounds: SoundSlots,
}

impl PomodoroEngine {
    /// Create a fresh engine: focus mode, full duration, paused, zero cycles.
    pub fn new() -> Self {
        let mode = TimerMode::Focus;
        Self {
            mode,
            time_left: mode.duration_secs(),
            initial_time: mode.duration_secs(),
            is_active: false,
            cycles_completed: 0,
            sounds: SoundSlots::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn initial_time(&self) -> u32 {
        self.initial_time
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    pub fn sounds(&self) -> &SoundSlots {
        &self.sounds
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        if self.initial_time == 0 {
            return 0.0;
        }
        1.0 - (self.time_left as f64 / self.initial_time as f64)
    }

    /// The sound to play after a completion that continued into `next`.
    /// Entering focus means a break just ended; entering a break means a
    /// focus interval just ended.
    pub fn completion_sound(&self, next: TimerMode) -> &str {
        if next.is_focus() {
            &self.sounds.break_finished
        } else {
            &self.sounds.focus_finished
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            time_left: self.time_left,
            initial_time: self.initial_time,
            is_active: self.is_active,
            cycles_completed: self.cycles_completed,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the countdown. No-op when already active or already at zero.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_active || self.time_left == 0 {
            return None;
        }
        self.is_active = true;
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.time_left,
            at: Utc::now(),
        })
    }

    /// Pause the countdown. No-op when not running.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_active {
            return None;
        }
        self.is_active = false;
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.time_left,
            at: Utc::now(),
        })
    }

    /// Restore the current mode's full duration and pause.
    /// `mode` and `cycles_completed` are untouched.
    pub fn reset(&mut self) -> Option<Event> {
        self.time_left = self.mode.duration_secs();
        self.initial_time = self.mode.duration_secs();
        self.is_active = false;
        Some(Event::TimerReset {
            mode: self.mode,
            at: Utc::now(),
        })
    }

    /// Unconditionally switch to `target` at its full duration.
    /// Manual mode switches always pause.
    pub fn set_mode(&mut self, target: TimerMode) -> Option<Event> {
        self.mode = target;
        self.time_left = target.duration_secs();
        self.initial_time = target.duration_secs();
        self.is_active = false;
        Some(Event::ModeChanged {
            mode: target,
            duration_secs: target.duration_secs(),
            at: Utc::now(),
        })
    }

    /// Update one of the two completion-sound slots.
    /// Configuration only; no state-machine effect.
    pub fn set_sound(&mut self, slot: SoundSlot, resource: impl Into<String>) {
        match slot {
            SoundSlot::FocusFinished => self.sounds.focus_finished = resource.into(),
            SoundSlot::BreakFinished => self.sounds.break_finished = resource.into(),
        }
    }

    /// Advance the machine by one elapsed second.
    ///
    /// While there is time left this just decrements. A tick that arrives
    /// with `time_left` already at zero performs the interval-completion
    /// transition instead and returns `Event::IntervalCompleted`; every
    /// other tick returns `None`.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_active {
            return None;
        }

        if self.time_left > 0 {
            self.time_left -= 1;
            return None;
        }

        let finished = self.mode;
        if finished.is_focus() {
            self.cycles_completed += 1;
        }

        let next = if finished.is_focus() {
            if self.cycles_completed > 0 && self.cycles_completed % LONG_BREAK_EVERY == 0 {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            }
        } else {
            TimerMode::Focus
        };

        // Auto-continue: the new interval starts running immediately.
        self.mode = next;
        self.time_left = next.duration_secs();
        self.initial_time = next.duration_secs();
        self.is_active = true;

        Some(Event::IntervalCompleted {
            finished,
            next,
            cycles_completed: self.cycles_completed,
            at: Utc::now(),
        })
    }
}

impl Default for PomodoroEngine {
    fn default() -> Self {
        Self::new()
    }
}
