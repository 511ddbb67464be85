//! Outbound event callbacks.
//!
//! The plugin layer supplies these at controller construction. Handlers run
//! on the controller's event-pump task and must return quickly; heavy work
//! belongs on the caller's side of the channel.

use crate::error::SessionError;
use std::fmt;
use std::sync::Arc;

type FinishedFn = dyn Fn() + Send + Sync;
type BufferingFn = dyn Fn(bool) + Send + Sync;
type ErrorFn = dyn Fn(SessionError) + Send + Sync;

/// Handlers for asynchronous playback events.
#[derive(Clone)]
pub struct PlaybackCallbacks {
    on_finished: Arc<FinishedFn>,
    on_buffering: Arc<BufferingFn>,
    on_error: Arc<ErrorFn>,
}

impl PlaybackCallbacks {
    /// Callbacks that ignore every event.
    pub fn new() -> Self {
        Self {
            on_finished: Arc::new(|| {}),
            on_buffering: Arc::new(|_| {}),
            on_error: Arc::new(|_| {}),
        }
    }

    /// Invoked once per stream when the engine reaches the end.
    pub fn on_finished(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_finished = Arc::new(handler);
        self
    }

    /// Invoked on every buffering start/stop edge.
    pub fn on_buffering(mut self, handler: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_buffering = Arc::new(handler);
        self
    }

    /// Invoked for engine failures arriving after a session reached ready.
    pub fn on_error(mut self, handler: impl Fn(SessionError) + Send + Sync + 'static) -> Self {
        self.on_error = Arc::new(handler);
        self
    }

    pub(crate) fn finished(&self) {
        (self.on_finished)();
    }

    pub(crate) fn buffering(&self, is_buffering: bool) {
        (self.on_buffering)(is_buffering);
    }

    pub(crate) fn error(&self, error: SessionError) {
        (self.on_error)(error);
    }
}

impl Default for PlaybackCallbacks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlaybackCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackCallbacks").finish_non_exhaustive()
    }
}
