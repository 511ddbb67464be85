//! # Playback Session Module
//!
//! Adaptation layer between a generic audio-player command surface and a
//! host-provided native playback engine.
//!
//! ## Overview
//!
//! This module handles:
//! - Capability probing of audio-type / engine-variant pairings
//! - Source resolution (files, bundled assets, network and live streams)
//! - The playback-session lifecycle: suspending open, two-slot
//!   current/retiring ownership, crossfade-out on stop
//! - Classification of raw engine failures into caller-facing categories
//!
//! Decoding, adaptive streaming, DRM license handling and audio output all
//! stay behind the [`bridge_engine`] traits.

pub mod callbacks;
pub mod config;
pub mod controller;
pub mod error;
pub mod prober;
pub mod request;
pub mod resolver;

pub use callbacks::PlaybackCallbacks;
pub use config::{FadeConfig, SessionConfig};
pub use controller::SessionController;
pub use error::{FailureKind, Result, SessionError};
pub use request::{AudioType, EngineVariant, PlaybackRequest};
pub use resolver::SourceResolver;
