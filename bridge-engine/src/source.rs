//! Resolved media source descriptions handed to a playback engine.
//!
//! A [`MediaSourceHandle`] is the output of source resolution: everything the
//! engine needs to start preparing a stream, with no playback policy attached.

use crate::drm::DrmSessionHandle;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default connect timeout applied to HTTP-backed sources.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(8_000);

/// Default read timeout applied to HTTP-backed sources.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(8_000);

/// Demuxing strategy the engine should select for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemuxerKind {
    /// Single progressive stream.
    Progressive {
        /// Tolerate seeking in variable-bitrate streams by assuming a
        /// constant bitrate (ADTS-style sources).
        constant_bitrate_seeking: bool,
    },
    /// HTTP Live Streaming playlists.
    Hls,
    /// MPEG-DASH manifests.
    Dash,
    /// Microsoft Smooth Streaming manifests.
    SmoothStreaming,
}

/// Configuration for an HTTP-backed data source.
#[derive(Debug, Clone)]
pub struct HttpSourceOptions {
    /// User agent sent with every request.
    pub user_agent: String,
    /// Request headers attached verbatim to every request.
    pub headers: HashMap<String, String>,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Read timeout.
    pub read_timeout: Duration,
    /// Whether redirects may cross between http and https.
    pub allow_cross_protocol_redirects: bool,
}

impl HttpSourceOptions {
    /// Create options with the given user agent and default timeouts.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            headers: HashMap::new(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            allow_cross_protocol_redirects: true,
        }
    }

    /// Replace the request headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Override both timeouts.
    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }
}

/// Where the media bytes come from.
#[derive(Debug, Clone)]
pub enum MediaLocation {
    /// Remote HTTP(S) stream.
    Http {
        url: String,
        options: HttpSourceOptions,
    },
    /// Local file already resolved to a concrete path.
    FileSystem { path: PathBuf },
}

/// A ready-to-play media source: location, demuxing strategy and optional
/// content decryption session.
#[derive(Debug, Clone)]
pub struct MediaSourceHandle {
    pub location: MediaLocation,
    pub demuxer: DemuxerKind,
    pub drm: Option<DrmSessionHandle>,
}

impl MediaSourceHandle {
    /// Create a handle without DRM.
    pub fn new(location: MediaLocation, demuxer: DemuxerKind) -> Self {
        Self {
            location,
            demuxer,
            drm: None,
        }
    }

    /// Attach a content decryption session.
    pub fn with_drm(mut self, drm: DrmSessionHandle) -> Self {
        self.drm = Some(drm);
        self
    }

    /// Returns `true` if the source is fetched over HTTP.
    pub fn is_remote(&self) -> bool {
        matches!(self.location, MediaLocation::Http { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_options_defaults() {
        let options = HttpSourceOptions::new("test-agent");
        assert_eq!(options.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(options.read_timeout, DEFAULT_READ_TIMEOUT);
        assert!(options.allow_cross_protocol_redirects);
        assert!(options.headers.is_empty());
    }

    #[test]
    fn source_handle_remote_check() {
        let remote = MediaSourceHandle::new(
            MediaLocation::Http {
                url: "https://example.com/a.mp3".into(),
                options: HttpSourceOptions::new("test-agent"),
            },
            DemuxerKind::Progressive {
                constant_bitrate_seeking: true,
            },
        );
        assert!(remote.is_remote());

        let local = MediaSourceHandle::new(
            MediaLocation::FileSystem {
                path: "/music/a.mp3".into(),
            },
            DemuxerKind::Progressive {
                constant_bitrate_seeking: false,
            },
        );
        assert!(!local.is_remote());
        assert!(local.drm.is_none());
    }
}
