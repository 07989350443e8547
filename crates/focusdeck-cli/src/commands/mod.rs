pub mod config;
pub mod task;
pub mod timer;

use focusdeck_core::EffectSink;

/// Terminal rendition of the presentation side effects. Everything goes to
/// stderr so JSON output on stdout stays parseable.
pub struct TerminalSink;

impl EffectSink for TerminalSink {
    fn toast_success(&self, message: &str) {
        eprintln!("* {message}");
    }

    fn play_sound(&self, resource: &str) {
        eprintln!("[sound] {resource}");
    }

    fn celebrate(&self) {
        eprintln!("[confetti]");
    }
}
