//! Capability probing.
//!
//! Rejects audio-type/engine-variant pairings the selected engine cannot
//! serve, before any engine or source resource is allocated. Callers use the
//! typed rejection to fall back to a different variant with a fresh open.

use crate::error::{Result, SessionError};
use crate::request::{AudioType, EngineVariant};

/// Check that `audio_type` is playable with `engine_variant`.
///
/// Adaptive variants (HLS, DASH, Smooth Streaming) only serve network and
/// livestream sources; local files and bundled assets require the default
/// variant. Network sources are accepted by every variant.
///
/// # Errors
///
/// Returns [`SessionError::Incompatible`] without side effects when the
/// pairing cannot be served.
pub fn check(audio_type: AudioType, engine_variant: EngineVariant) -> Result<()> {
    if engine_variant.is_adaptive() && !audio_type.is_remote() {
        return Err(SessionError::Incompatible {
            audio_type,
            variant: engine_variant,
        });
    }
    Ok(())
}
