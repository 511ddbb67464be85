//! Playback request types.
//!
//! A [`PlaybackRequest`] describes one audio source the caller wants opened:
//! where it lives, what kind of stream it is, and any headers or key material
//! needed to fetch and decrypt it. Requests are immutable once built and
//! fully consumed by source resolution.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of audio source the caller declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioType {
    /// Local file addressed by filesystem path.
    File,
    /// Bundled asset addressed by logical name.
    Asset,
    /// Bounded remote stream addressed by URL.
    Network,
    /// Unbounded remote stream; duration is always reported as zero.
    Livestream,
}

impl AudioType {
    /// Returns `true` for sources fetched over the network.
    pub fn is_remote(&self) -> bool {
        matches!(self, AudioType::Network | AudioType::Livestream)
    }
}

/// Which streaming-protocol strategy the underlying engine uses.
///
/// Fixed at controller construction; callers that want fallback issue a
/// fresh open against a controller built with a different variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineVariant {
    /// Plain progressive playback, the only variant serving local sources.
    Default,
    /// HTTP Live Streaming.
    Hls,
    /// MPEG-DASH.
    Dash,
    /// Microsoft Smooth Streaming.
    SmoothStreaming,
}

impl EngineVariant {
    /// Returns `true` for adaptive-streaming variants, which only serve
    /// network and livestream sources.
    pub fn is_adaptive(&self) -> bool {
        !matches!(self, EngineVariant::Default)
    }
}

/// Everything needed to open one audio source.
#[derive(Debug, Clone)]
pub struct PlaybackRequest {
    /// Path, logical asset name or URL, depending on `audio_type`.
    pub source_locator: String,
    /// Declared source kind.
    pub audio_type: AudioType,
    /// Package/bundle qualifier for asset lookup.
    pub asset_package: Option<String>,
    /// Request headers attached verbatim to network fetches.
    pub request_headers: HashMap<String, String>,
    /// Clear-key DRM payload for encrypted local files.
    pub drm_key: Option<Bytes>,
}

impl PlaybackRequest {
    /// Create a request with no headers, package hint or key material.
    pub fn new(source_locator: impl Into<String>, audio_type: AudioType) -> Self {
        Self {
            source_locator: source_locator.into(),
            audio_type,
            asset_package: None,
            request_headers: HashMap::new(),
            drm_key: None,
        }
    }

    /// Qualify asset lookup with a package/bundle hint. Blank hints are
    /// treated as absent.
    pub fn with_asset_package(mut self, package: impl Into<String>) -> Self {
        let package = package.into();
        self.asset_package = if package.trim().is_empty() {
            None
        } else {
            Some(package)
        };
        self
    }

    /// Add one request header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.insert(key.into(), value.into());
        self
    }

    /// Ingest headers from a loosely-typed channel payload. Entries with a
    /// missing key or value are skipped.
    pub fn with_headers<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (Option<String>, Option<String>)>,
    {
        for (key, value) in entries {
            if let (Some(key), Some(value)) = (key, value) {
                self.request_headers.insert(key, value);
            }
        }
        self
    }

    /// Attach clear-key DRM material.
    pub fn with_clear_key(mut self, key: Bytes) -> Self {
        self.drm_key = Some(key);
        self
    }
}
