//! Playback engine control surface and event contract.
//!
//! These abstractions let the session core drive an already-complete native
//! media engine (prepare/play/pause/seek and friends) while receiving the
//! engine's asynchronous state changes through an injected listener. The
//! engine delivers events on its own internal thread; consumers must treat
//! listener delivery as racing any in-flight control call.

use crate::error::Result;
use crate::source::MediaSourceHandle;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Identifier the engine assigns to its audio output session.
///
/// Used by hosts to attach external audio effects. Engines that have not yet
/// routed audio report no id; assignment is surfaced through
/// [`EngineEvent::AudioSessionAssigned`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioSessionId(u32);

impl AudioSessionId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Coarse playback states reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No source prepared or preparation reset.
    Idle,
    /// The engine is loading media and cannot play yet.
    Buffering,
    /// Enough media is buffered to play; duration is known when bounded.
    Ready,
    /// The end of the stream was reached.
    Ended,
}

/// Asynchronous notifications emitted by the engine.
#[derive(Debug)]
pub enum EngineEvent {
    /// The playback state changed. Engines may repeat the current state;
    /// consumers de-duplicate.
    StateChanged(EngineState),
    /// Preparation or playback failed.
    Failed(crate::error::EngineError),
    /// The audio output session id was assigned or changed.
    AudioSessionAssigned(AudioSessionId),
}

/// Channel end the engine pushes its events into.
pub type EngineEventSink = UnboundedSender<EngineEvent>;

/// Buffering thresholds applied when building an engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadControl {
    /// Target steady-state buffer duration.
    pub min_buffer: Duration,
    /// Maximum buffered media duration.
    pub max_buffer: Duration,
    /// Media that must be buffered before playback starts.
    pub buffer_for_playback: Duration,
    /// Media that must be buffered to resume after a rebuffer.
    pub buffer_for_rebuffer: Duration,
}

impl LoadControl {
    /// Engine-default maximum buffer duration.
    pub const MAX_BUFFER_DEFAULT: Duration = Duration::from_millis(50_000);

    /// Thresholds raised to absorb network jitter: both the steady-state and
    /// maximum buffer are set to the engine's maximum default.
    pub fn enlarged() -> Self {
        Self {
            min_buffer: Self::MAX_BUFFER_DEFAULT,
            max_buffer: Self::MAX_BUFFER_DEFAULT,
            ..Self::default()
        }
    }
}

impl Default for LoadControl {
    fn default() -> Self {
        Self {
            min_buffer: Duration::from_millis(15_000),
            max_buffer: Self::MAX_BUFFER_DEFAULT,
            buffer_for_playback: Duration::from_millis(2_500),
            buffer_for_rebuffer: Duration::from_millis(5_000),
        }
    }
}

/// Control surface of one live engine instance.
///
/// One instance backs exactly one playback session: it is created for an
/// `open`, prepared once, and released when the session ends. Control calls
/// are async because engines marshal them onto an internal playback thread;
/// property reads return the engine's last-known values synchronously.
///
/// `release` must be idempotent: sessions can be released from several
/// teardown paths (forced supersede, fade completion, explicit stop) and a
/// second release must be a no-op.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Install the listener that receives [`EngineEvent`]s. Replaces any
    /// previously installed listener.
    fn install_listener(&self, sink: EngineEventSink);

    /// Start asynchronous preparation of the given source. Completion is
    /// signalled through the listener as a `Ready` state or a failure.
    async fn prepare(&self, source: MediaSourceHandle) -> Result<()>;

    /// Begin or resume playback.
    async fn play(&self) -> Result<()>;

    /// Pause playback, keeping position and duration queryable.
    async fn pause(&self) -> Result<()>;

    /// Stop playback and discard the prepared source.
    async fn stop(&self) -> Result<()>;

    /// Release all native resources. Idempotent.
    async fn release(&self) -> Result<()>;

    /// Seek to an absolute position.
    async fn seek_to(&self, position: Duration) -> Result<()>;

    /// Set output volume, normalized to `0.0..=1.0`.
    async fn set_volume(&self, volume: f32) -> Result<()>;

    /// Set the playback speed factor (`> 0`), preserving pitch.
    async fn set_speed(&self, factor: f32) -> Result<()>;

    /// Set the pitch factor (`> 0`), preserving speed.
    async fn set_pitch(&self, factor: f32) -> Result<()>;

    /// Enable or disable repeating the current stream.
    fn set_loop_single(&self, enabled: bool);

    /// Whether the current stream repeats.
    fn loop_single(&self) -> bool;

    /// Whether the engine is actively playing.
    fn is_playing(&self) -> bool;

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Stream duration, when known and bounded.
    fn duration(&self) -> Option<Duration>;

    /// Audio output session id, when already assigned.
    fn audio_session_id(&self) -> Option<AudioSessionId>;
}

/// Creates engine instances, one per playback session.
pub trait EngineFactory: Send + Sync {
    /// Build a fresh engine configured with the given buffering thresholds.
    fn create(&self, load_control: &LoadControl) -> Result<Arc<dyn PlaybackEngine>>;
}
