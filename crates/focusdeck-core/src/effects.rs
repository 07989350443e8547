//! Presentation side effects behind a fire-and-forget seam.
//!
//! The Task Engine calls these synchronously on completion transitions but
//! never awaits or inspects the outcome; a blocked sound or a failed toast
//! must not affect engine state, so every method returns `()` and defaults
//! to a no-op.

use std::sync::Arc;

pub trait EffectSink: Send + Sync {
    /// Show a short success/info message.
    fn toast_success(&self, _message: &str) {}

    /// Play a named sound resource.
    fn play_sound(&self, _resource: &str) {}

    /// Play the celebratory animation.
    fn celebrate(&self) {}
}

/// Sink that swallows everything.
pub struct NullSink;

impl EffectSink for NullSink {}

impl<T: EffectSink + ?Sized> EffectSink for Arc<T> {
    fn toast_success(&self, message: &str) {
        (**self).toast_success(message)
    }

    fn play_sound(&self, resource: &str) {
        (**self).play_sound(resource)
    }

    fn celebrate(&self) {
        (**self).celebrate()
    }
}
