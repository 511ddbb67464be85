//! # Engine Bridge Traits
//!
//! Contract between the playback-session core and a host-provided native
//! media engine.
//!
//! ## Overview
//!
//! The session core contains no decoding, buffering, networking or DRM logic
//! of its own; all of that lives in an already-complete engine supplied by
//! the host. This crate defines the seams:
//!
//! - [`PlaybackEngine`](engine::PlaybackEngine) - control surface of one
//!   engine instance, with events delivered through an injected listener
//! - [`EngineFactory`](engine::EngineFactory) - builds one engine per
//!   playback session, configured with buffering thresholds
//! - [`MediaSourceHandle`](source::MediaSourceHandle) - resolved,
//!   ready-to-play source description
//! - [`AssetResolver`](assets::AssetResolver) - logical bundled-asset name
//!   to on-device path
//! - [`DrmProvider`](drm::DrmProvider) - clear-key decryption sessions
//!
//! ## Threading Model
//!
//! Control calls are async and may be issued from any task. Events arrive on
//! the engine's internal thread through the installed
//! [`EngineEventSink`](engine::EngineEventSink) and can race in-flight control
//! calls; consumers own the ordering discipline.
//!
//! ## Error Handling
//!
//! All traits report failures as [`EngineError`](error::EngineError). The
//! variants preserve enough structure (HTTP response codes, transport vs.
//! engine faults) for callers to classify failures without string matching
//! on vendor messages.

pub mod assets;
pub mod drm;
pub mod engine;
pub mod error;
pub mod source;

pub use error::EngineError;

// Re-export commonly used types
pub use assets::AssetResolver;
pub use drm::{DrmProvider, DrmSessionHandle};
pub use engine::{
    AudioSessionId, EngineEvent, EngineEventSink, EngineFactory, EngineState, LoadControl,
    PlaybackEngine,
};
pub use source::{DemuxerKind, HttpSourceOptions, MediaLocation, MediaSourceHandle};
