//! Clear-key content decryption.
//!
//! The engine owns the actual decryption; the core only forwards key material
//! and attaches the resulting opaque session handle to a media source.

use crate::error::Result;
use bytes::Bytes;

/// Opaque handle to a DRM session created by the host engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrmSessionHandle(u64);

impl DrmSessionHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Provider for clear-key decryption sessions.
///
/// Clear-key means the symmetric key is supplied directly by the caller; no
/// license server round trip happens here.
pub trait DrmProvider: Send + Sync {
    /// Create a decryption session keyed by the given payload.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Drm`](crate::error::EngineError::Drm) if the key
    /// is rejected or the platform DRM component is unavailable.
    fn clear_key_session(&self, key: Bytes) -> Result<DrmSessionHandle>;
}
