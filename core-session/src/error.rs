//! # Session Error Types
//!
//! Error taxonomy for the playback-session core, plus the classifier that
//! turns raw engine failures into caller-facing categories.

use crate::request::{AudioType, EngineVariant};
use bridge_engine::EngineError;
use thiserror::Error;

/// Caller-facing classification of a playback failure.
///
/// Purely advisory: it lets callers decide on retry or engine-variant
/// fallback, but triggers no retry behavior here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The remote endpoint answered with an error status (>= 400).
    NetworkUnreachable,
    /// Any other transport-level problem (DNS, socket, timeout).
    NetworkOther,
    /// The engine itself faulted.
    PlayerFault,
}

/// Errors surfaced by the session controller.
#[derive(Error, Debug)]
pub enum SessionError {
    // ========================================================================
    // Pre-open Errors
    // ========================================================================
    /// The declared audio type cannot be served by the selected engine
    /// variant. Raised before any resource is allocated.
    #[error("audio type {audio_type:?} is not playable with engine variant {variant:?}")]
    Incompatible {
        audio_type: AudioType,
        variant: EngineVariant,
    },

    /// The audio source could not be constructed or opened (bad path,
    /// missing asset, unreadable file, DRM setup failure).
    #[error("failed to resolve audio source: {0}")]
    Resolution(String),

    // ========================================================================
    // Engine Errors
    // ========================================================================
    /// The engine failed during prepare or playback.
    #[error("playback failed ({kind:?}): {source}")]
    Playback {
        kind: FailureKind,
        #[source]
        source: EngineError,
    },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The pending `open` was cancelled before the engine reported ready or
    /// failed: a newer `open` force-released the session, or it was stopped.
    #[error("open superseded before the engine became ready")]
    Superseded,

    /// Session configuration failed validation.
    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),

    /// A control parameter was out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl SessionError {
    /// Classification of this error, when it wraps an engine failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            SessionError::Playback { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Classify a raw engine failure.
///
/// An HTTP-style invalid response code of 400 or above means the source is
/// unreachable; any other transport failure, or a message containing
/// "unable to connect" (case-insensitive), is a generic network problem;
/// everything else is attributed to the player.
pub fn classify(error: &EngineError) -> FailureKind {
    match error {
        EngineError::InvalidResponseCode { status, .. } if *status >= 400 => {
            FailureKind::NetworkUnreachable
        }
        EngineError::InvalidResponseCode { .. } | EngineError::Transport(_) => {
            FailureKind::NetworkOther
        }
        other if other.to_string().to_lowercase().contains("unable to connect") => {
            FailureKind::NetworkOther
        }
        _ => FailureKind::PlayerFault,
    }
}

/// Wrap a raw engine failure into a classified [`SessionError`].
pub fn map_engine_error(error: EngineError) -> SessionError {
    let kind = classify(&error);
    SessionError::Playback {
        kind,
        source: error,
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
