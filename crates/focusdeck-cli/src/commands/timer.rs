use clap::Subcommand;
use focusdeck_core::{
    Database, EffectSink, Event, PomodoroEngine, PomodoroStore, SoundSlot, TimerMode,
};

use super::TerminalSink;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Restore the current mode's full duration (mode and cycles kept)
    Reset,
    /// Switch mode: focus, short-break, long-break
    Mode { mode: String },
    /// Advance the machine by elapsed seconds (scripting driver)
    Tick {
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Own the one-second tick loop in the foreground (Ctrl-C to stop)
    Run,
    /// Configure a completion sound slot: focus-finished or break-finished
    Sound { slot: String, resource: String },
    /// Print current timer state as JSON
    Status,
}

fn parse_mode(value: &str) -> Result<TimerMode, Box<dyn std::error::Error>> {
    match value {
        "focus" => Ok(TimerMode::Focus),
        "short-break" | "shortBreak" => Ok(TimerMode::ShortBreak),
        "long-break" | "longBreak" => Ok(TimerMode::LongBreak),
        other => Err(format!("unknown mode '{other}' (focus, short-break, long-break)").into()),
    }
}

fn parse_slot(value: &str) -> Result<SoundSlot, Box<dyn std::error::Error>> {
    match value {
        "focus-finished" => Ok(SoundSlot::FocusFinished),
        "break-finished" => Ok(SoundSlot::BreakFinished),
        other => Err(format!("unknown slot '{other}' (focus-finished, break-finished)").into()),
    }
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

/// Print a completion and play the matching one-shot sound.
fn handle_completion(
    engine: &PomodoroEngine,
    event: &Event,
) -> Result<(), Box<dyn std::error::Error>> {
    print_event(event)?;
    if let Event::IntervalCompleted { next, .. } = event {
        TerminalSink.play_sound(engine.completion_sound(*next));
    }
    Ok(())
}

pub async fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = PomodoroStore::new(Database::open()?);
    let mut engine = store.load();

    match action {
        TimerAction::Start => match engine.start() {
            Some(event) => print_event(&event)?,
            None => print_event(&engine.snapshot())?,
        },
        TimerAction::Pause => match engine.pause() {
            Some(event) => print_event(&event)?,
            None => print_event(&engine.snapshot())?,
        },
        TimerAction::Reset => {
            if let Some(event) = engine.reset() {
                print_event(&event)?;
            }
        }
        TimerAction::Mode { mode } => {
            let target = parse_mode(&mode)?;
            if let Some(event) = engine.set_mode(target) {
                print_event(&event)?;
            }
        }
        TimerAction::Tick { count } => {
            for _ in 0..count {
                if let Some(event) = engine.tick() {
                    handle_completion(&engine, &event)?;
                }
            }
            print_event(&engine.snapshot())?;
        }
        TimerAction::Run => {
            // The single owner of the one-second driver. Each tick mutates
            // the engine, so each tick is persisted.
            if let Some(event) = engine.start() {
                print_event(&event)?;
            }
            store.save(&engine)?;
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
            interval.tick().await; // First tick fires immediately; skip it.
            loop {
                interval.tick().await;
                if let Some(event) = engine.tick() {
                    handle_completion(&engine, &event)?;
                }
                store.save(&engine)?;
            }
        }
        TimerAction::Sound { slot, resource } => {
            engine.set_sound(parse_slot(&slot)?, resource);
            print_event(&engine.snapshot())?;
        }
        TimerAction::Status => {
            print_event(&engine.snapshot())?;
        }
    }

    store.save(&engine)?;
    Ok(())
}
