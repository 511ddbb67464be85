//! # Session Controller
//!
//! Owns the playback-session lifecycle on top of a host-provided engine:
//! at most one *current* session plus at most one *retiring* session that is
//! fading out. All control operations are expected from one logical caller;
//! engine events arrive asynchronously and are serialized through a
//! per-session event pump.
//!
//! ## Lifecycle
//!
//! ```text
//!          open()                first Ready            stop(crossfade)
//!  Idle ───────────> Opening ───────────────> Ready ───────────────> Retiring
//!    ^                  │ first error            │  stop(no fade)        │
//!    └──────────────────┴────────────────────────┴───────────<───────────┘
//!                                                      fade reaches zero
//! ```
//!
//! `open` is the only suspending operation: it completes with the measured
//! duration on the session's first `Ready` event, or with the classified
//! failure on its first error, whichever arrives first. The losing event is
//! ignored for the open result; errors after ready surface through the
//! injected error callback instead.
//!
//! ## Teardown paths
//!
//! Every path that retires a session must end in an engine release and must
//! cancel the fade tick: natural fade completion, an explicit non-crossfade
//! stop, a forced supersede by a new `open`, and a `pause` on the session
//! that replaced the fading one. The fade task checks its cancellation token
//! on every tick and never touches an engine it no longer owns.

use crate::callbacks::PlaybackCallbacks;
use crate::config::{FadeConfig, SessionConfig};
use crate::error::{map_engine_error, Result, SessionError};
use crate::prober;
use crate::request::{AudioType, EngineVariant, PlaybackRequest};
use crate::resolver::SourceResolver;
use bridge_engine::{
    AssetResolver, AudioSessionId, DrmProvider, EngineEvent, EngineFactory, EngineState,
    PlaybackEngine,
};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

type PendingOpen = Arc<Mutex<Option<oneshot::Sender<Result<Duration>>>>>;
type SessionIdWaiter = Box<dyn FnOnce(AudioSessionId) + Send>;

/// A session that is current: opening or ready.
struct ActiveSession {
    serial: u64,
    engine: Arc<dyn PlaybackEngine>,
    /// Single-assignment result slot for the suspending `open`.
    pending_open: PendingOpen,
    pump: JoinHandle<()>,
}

/// A session fading out towards release. Never re-promoted to current.
struct RetiringSession {
    engine: Arc<dyn PlaybackEngine>,
    cancel: CancellationToken,
}

/// Two-slot ownership record shared with the event pumps and the fade task.
struct Slots {
    current: Option<ActiveSession>,
    retiring: Option<RetiringSession>,
    session_id_waiters: Vec<SessionIdWaiter>,
    next_serial: u64,
}

impl Slots {
    fn new() -> Self {
        Self {
            current: None,
            retiring: None,
            session_id_waiters: Vec::new(),
            next_serial: 0,
        }
    }

    fn is_current(&self, serial: u64) -> bool {
        self.current.as_ref().is_some_and(|s| s.serial == serial)
    }
}

/// Drives playback sessions against one engine variant.
///
/// Construction fixes the engine variant; callers implementing fallback
/// across variants build one controller per variant and retry `open` on the
/// next one when they receive [`SessionError::Incompatible`] or a classified
/// playback failure.
pub struct SessionController {
    variant: EngineVariant,
    engines: Arc<dyn EngineFactory>,
    resolver: SourceResolver,
    callbacks: PlaybackCallbacks,
    fade: FadeConfig,
    slots: Arc<Mutex<Slots>>,
}

impl SessionController {
    /// Create a controller for the given engine variant.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] when `config` fails
    /// validation.
    pub fn new(
        variant: EngineVariant,
        engines: Arc<dyn EngineFactory>,
        assets: Arc<dyn AssetResolver>,
        drm: Arc<dyn DrmProvider>,
        callbacks: PlaybackCallbacks,
        config: SessionConfig,
    ) -> Result<Self> {
        config.validate()?;
        let fade = config.fade;
        Ok(Self {
            variant,
            engines,
            resolver: SourceResolver::new(assets, drm, config),
            callbacks,
            fade,
            slots: Arc::new(Mutex::new(Slots::new())),
        })
    }

    /// The engine variant this controller was built for.
    pub fn variant(&self) -> EngineVariant {
        self.variant
    }

    /// Open an audio source and suspend until the engine reports ready or
    /// fails.
    ///
    /// Returns the measured duration; zero means unbounded (livestreams
    /// always report zero, whatever the engine measured). Any existing
    /// current session is force-released first, and its unresolved open (if
    /// any) fails with [`SessionError::Superseded`]. A fade-out in progress
    /// survives the open unless a current session had to be torn down.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Incompatible`] before any resource is allocated
    /// - [`SessionError::Resolution`] when the source cannot be built; the
    ///   partially-created engine is released
    /// - [`SessionError::Playback`] when the engine fails before first ready
    /// - [`SessionError::Superseded`] when a newer open or a stop cancelled
    ///   this one
    #[instrument(skip(self, request), fields(audio_type = ?request.audio_type, variant = ?self.variant))]
    pub async fn open(&self, request: PlaybackRequest) -> Result<Duration> {
        prober::check(request.audio_type, self.variant)?;

        let had_current = self.force_release_current().await;
        if had_current {
            self.cancel_fade_out().await;
        }

        let load_control = self
            .resolver
            .load_control(request.audio_type, self.variant);
        let engine = self
            .engines
            .create(&load_control)
            .map_err(map_engine_error)?;

        let source = match self.resolver.resolve(&request, self.variant) {
            Ok(source) => source,
            Err(error) => {
                let _ = engine.release().await;
                return Err(error);
            }
        };

        let (result_tx, result_rx) = oneshot::channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        engine.install_listener(event_tx);

        let pending_open: PendingOpen = Arc::new(Mutex::new(Some(result_tx)));
        let serial = {
            let mut slots = self.slots.lock();
            let serial = slots.next_serial;
            slots.next_serial += 1;
            serial
        };

        let pump = tokio::spawn(pump_events(
            Arc::downgrade(&self.slots),
            engine.clone(),
            serial,
            request.audio_type,
            pending_open.clone(),
            self.callbacks.clone(),
            event_rx,
        ));

        {
            let mut slots = self.slots.lock();
            slots.current = Some(ActiveSession {
                serial,
                engine: engine.clone(),
                pending_open: pending_open.clone(),
                pump,
            });
        }

        info!(serial, "session opening");

        if let Err(error) = engine.prepare(source).await {
            let mapped = map_engine_error(error);
            if pending_open.lock().take().is_some() {
                // No event raced the open slot; this failure is the open
                // result and the session is released.
                self.release_if_serial(serial).await;
                return Err(mapped);
            }
            // The first ready already resolved the open: the session stays
            // current and the failure surfaces like a post-ready error.
            warn!(serial, %mapped, "prepare failed after ready");
            if self.slots.lock().is_current(serial) {
                self.callbacks.buffering(false);
                self.callbacks.error(mapped);
            }
        }

        match result_rx.await {
            Ok(result) => result,
            // Sender dropped without resolving: the session was torn down.
            Err(_) => Err(SessionError::Superseded),
        }
    }

    /// Begin or resume playback of the current session.
    pub async fn play(&self) -> Result<()> {
        if let Some(engine) = self.current_engine() {
            engine.play().await.map_err(map_engine_error)?;
        }
        Ok(())
    }

    /// Pause the current session.
    ///
    /// Also force-cancels any fade-out still running for the previous
    /// session: pausing the replacement means it wins outright.
    pub async fn pause(&self) -> Result<()> {
        self.cancel_fade_out().await;
        if let Some(engine) = self.current_engine() {
            engine.pause().await.map_err(map_engine_error)?;
        }
        Ok(())
    }

    /// Stop the current session.
    ///
    /// With `cross_fade`, the session moves to the retiring slot and fades
    /// out on a periodic tick until silent, then stops and releases itself.
    /// Without it, the session stops and releases synchronously. An open
    /// still in flight for this session fails with
    /// [`SessionError::Superseded`].
    pub async fn stop(&self, cross_fade: bool) {
        let session = { self.slots.lock().current.take() };
        let Some(session) = session else {
            return;
        };

        // Only one session may be retiring; settle the older fade first.
        self.cancel_fade_out().await;

        if let Some(result_tx) = session.pending_open.lock().take() {
            let _ = result_tx.send(Err(SessionError::Superseded));
        }
        self.slots.lock().session_id_waiters.clear();
        session.pump.abort();

        if cross_fade {
            info!(serial = session.serial, "session retiring with crossfade");
            let cancel = CancellationToken::new();
            {
                let mut slots = self.slots.lock();
                slots.retiring = Some(RetiringSession {
                    engine: session.engine.clone(),
                    cancel: cancel.clone(),
                });
            }
            tokio::spawn(run_fade_out(
                session.engine,
                Arc::downgrade(&self.slots),
                self.fade,
                cancel,
            ));
        } else {
            info!(serial = session.serial, "session stopped");
            let _ = session.engine.stop().await;
            let _ = session.engine.release().await;
        }
    }

    /// Seek the current session to an absolute position.
    pub async fn seek_to(&self, position: Duration) -> Result<()> {
        if let Some(engine) = self.current_engine() {
            engine.seek_to(position).await.map_err(map_engine_error)?;
        }
        Ok(())
    }

    /// Set the current session's volume. Values outside `0.0..=1.0` are
    /// clamped.
    pub async fn set_volume(&self, volume: f32) -> Result<()> {
        if let Some(engine) = self.current_engine() {
            engine
                .set_volume(volume.clamp(0.0, 1.0))
                .await
                .map_err(map_engine_error)?;
        }
        Ok(())
    }

    /// Set the current session's playback speed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidParameter`] when `factor` is not
    /// strictly positive.
    pub async fn set_speed(&self, factor: f32) -> Result<()> {
        if factor <= 0.0 || factor.is_nan() {
            return Err(SessionError::InvalidParameter(format!(
                "speed factor must be > 0, got {factor}"
            )));
        }
        if let Some(engine) = self.current_engine() {
            engine.set_speed(factor).await.map_err(map_engine_error)?;
        }
        Ok(())
    }

    /// Set the current session's pitch.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidParameter`] when `factor` is not
    /// strictly positive.
    pub async fn set_pitch(&self, factor: f32) -> Result<()> {
        if factor <= 0.0 || factor.is_nan() {
            return Err(SessionError::InvalidParameter(format!(
                "pitch factor must be > 0, got {factor}"
            )));
        }
        if let Some(engine) = self.current_engine() {
            engine.set_pitch(factor).await.map_err(map_engine_error)?;
        }
        Ok(())
    }

    /// Whether the current session is actively playing.
    pub fn is_playing(&self) -> bool {
        self.current_engine().is_some_and(|e| e.is_playing())
    }

    /// Current playback position, zero when no session exists.
    pub fn position(&self) -> Duration {
        self.current_engine()
            .map_or(Duration::ZERO, |e| e.position())
    }

    /// Whether the current session repeats its single stream.
    pub fn loop_single_audio(&self) -> bool {
        self.current_engine().is_some_and(|e| e.loop_single())
    }

    /// Enable or disable repeating the current stream.
    pub fn set_loop_single_audio(&self, enabled: bool) {
        if let Some(engine) = self.current_engine() {
            engine.set_loop_single(enabled);
        }
    }

    /// Deliver the engine's audio session id to `callback`.
    ///
    /// Invokes it immediately when the id is already assigned; otherwise
    /// registers a one-shot waiter fired on the engine's first assignment.
    /// Subsequent id changes do not re-invoke it. Without a current session
    /// the callback is dropped.
    pub fn audio_session_id(&self, callback: impl FnOnce(AudioSessionId) + Send + 'static) {
        let id = {
            let mut slots = self.slots.lock();
            let Some(current) = slots.current.as_ref() else {
                return;
            };
            match current.engine.audio_session_id() {
                Some(id) => id,
                None => {
                    slots.session_id_waiters.push(Box::new(callback));
                    return;
                }
            }
        };
        // Invoked outside the lock; the handler may re-enter the controller.
        callback(id);
    }

    fn current_engine(&self) -> Option<Arc<dyn PlaybackEngine>> {
        self.slots.lock().current.as_ref().map(|s| s.engine.clone())
    }

    /// Release the current session unconditionally. Returns whether one
    /// existed. An unresolved open fails with `Superseded`.
    async fn force_release_current(&self) -> bool {
        let session = { self.slots.lock().current.take() };
        let Some(session) = session else {
            return false;
        };
        if let Some(result_tx) = session.pending_open.lock().take() {
            let _ = result_tx.send(Err(SessionError::Superseded));
        }
        debug!(serial = session.serial, "force-releasing current session");
        let _ = session.engine.release().await;
        session.pump.abort();
        self.slots.lock().session_id_waiters.clear();
        true
    }

    /// Stop and release the retiring session, cancelling its fade tick.
    async fn cancel_fade_out(&self) {
        let retiring = { self.slots.lock().retiring.take() };
        if let Some(retiring) = retiring {
            debug!("cancelling fade-out");
            retiring.cancel.cancel();
            let _ = retiring.engine.stop().await;
            let _ = retiring.engine.release().await;
        }
    }

    /// Release the current session only if it still is the given one.
    async fn release_if_serial(&self, serial: u64) {
        let session = {
            let mut slots = self.slots.lock();
            if slots.is_current(serial) {
                slots.current.take()
            } else {
                None
            }
        };
        if let Some(session) = session {
            let _ = session.engine.release().await;
            session.pump.abort();
        }
    }
}

/// Per-session event pump: interprets raw engine events for one session.
///
/// The pending-open slot is resolved exactly once, by whichever of first
/// ready or first error wins the race. Outbound callbacks fire only while
/// this session is still current.
async fn pump_events(
    slots: Weak<Mutex<Slots>>,
    engine: Arc<dyn PlaybackEngine>,
    serial: u64,
    audio_type: AudioType,
    pending_open: PendingOpen,
    callbacks: PlaybackCallbacks,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
) {
    let mut last_state: Option<EngineState> = None;

    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::StateChanged(state) => {
                // Engines may repeat the current state on parameter changes.
                if last_state == Some(state) {
                    continue;
                }
                last_state = Some(state);

                match state {
                    EngineState::Buffering => {
                        if is_current(&slots, serial) {
                            callbacks.buffering(true);
                        }
                    }
                    EngineState::Ready => {
                        if is_current(&slots, serial) {
                            callbacks.buffering(false);
                        }
                        if let Some(result_tx) = pending_open.lock().take() {
                            let duration = if audio_type == AudioType::Livestream {
                                // Livestreams are unbounded whatever the
                                // engine measured.
                                Duration::ZERO
                            } else {
                                engine.duration().unwrap_or(Duration::ZERO)
                            };
                            debug!(serial, ?duration, "session ready");
                            let _ = result_tx.send(Ok(duration));
                        }
                    }
                    EngineState::Ended => {
                        if is_current(&slots, serial) {
                            // Paused, not stopped: position and duration stay
                            // queryable after the stream ends.
                            if let Err(error) = engine.pause().await {
                                warn!(serial, %error, "pause after ended failed");
                            }
                            callbacks.finished();
                            callbacks.buffering(false);
                        }
                    }
                    EngineState::Idle => {}
                }
            }
            EngineEvent::Failed(error) => {
                let mapped = map_engine_error(error);
                let unresolved_open = pending_open.lock().take();
                if let Some(result_tx) = unresolved_open {
                    // Failure before first ready: the open itself fails and
                    // the session is released.
                    warn!(serial, %mapped, "session failed before ready");
                    let _ = result_tx.send(Err(mapped));
                    remove_if_current(&slots, serial);
                    let _ = engine.release().await;
                    return;
                }
                if is_current(&slots, serial) {
                    warn!(serial, %mapped, "session error after ready");
                    callbacks.error(mapped);
                }
            }
            EngineEvent::AudioSessionAssigned(id) => {
                let waiters = match slots.upgrade() {
                    Some(slots) => {
                        let mut slots = slots.lock();
                        if slots.is_current(serial) {
                            std::mem::take(&mut slots.session_id_waiters)
                        } else {
                            Vec::new()
                        }
                    }
                    None => Vec::new(),
                };
                for waiter in waiters {
                    waiter(id);
                }
            }
        }
    }
}

/// Periodic fade-out of a retiring session.
///
/// Applies the current volume, then decrements, until the level crosses zero;
/// the engine is then stopped and released. The cancellation token is checked
/// before every application so a cancelled fade never touches an engine the
/// controller already released.
async fn run_fade_out(
    engine: Arc<dyn PlaybackEngine>,
    slots: Weak<Mutex<Slots>>,
    fade: FadeConfig,
    cancel: CancellationToken,
) {
    let mut volume = 1.0f32;
    let mut ticker = tokio::time::interval(fade.interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                // The canceller owns stop/release.
                return;
            }
            _ = ticker.tick() => {
                if cancel.is_cancelled() {
                    return;
                }
                if engine.set_volume(volume.max(0.0)).await.is_err() {
                    break;
                }
                volume -= fade.step;
                if volume <= 0.0 {
                    break;
                }
            }
        }
    }

    debug!("fade-out complete, releasing retiring session");
    let _ = engine.stop().await;
    let _ = engine.release().await;

    if let Some(slots) = slots.upgrade() {
        let mut slots = slots.lock();
        let finished = slots
            .retiring
            .as_ref()
            .is_some_and(|r| Arc::ptr_eq(&r.engine, &engine));
        if finished {
            slots.retiring = None;
        }
    }
}

fn is_current(slots: &Weak<Mutex<Slots>>, serial: u64) -> bool {
    slots
        .upgrade()
        .is_some_and(|slots| slots.lock().is_current(serial))
}

fn remove_if_current(slots: &Weak<Mutex<Slots>>, serial: u64) {
    if let Some(slots) = slots.upgrade() {
        let mut slots = slots.lock();
        if slots.is_current(serial) {
            slots.current = None;
        }
    }
}
