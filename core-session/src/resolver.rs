//! # Source Resolution
//!
//! Turns a [`PlaybackRequest`] into a ready-to-play [`MediaSourceHandle`]:
//! header passthrough and demuxer selection for remote streams, clear-key
//! attachment for local files, logical-path resolution for bundled assets.
//! Everything that actually fetches, demuxes or decrypts lives behind the
//! `bridge-engine` traits.

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::request::{AudioType, EngineVariant, PlaybackRequest};
use bridge_engine::{
    AssetResolver, DemuxerKind, DrmProvider, HttpSourceOptions, LoadControl, MediaLocation,
    MediaSourceHandle,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Builds engine-ready media sources from playback requests.
pub struct SourceResolver {
    assets: Arc<dyn AssetResolver>,
    drm: Arc<dyn DrmProvider>,
    config: SessionConfig,
}

impl SourceResolver {
    pub fn new(
        assets: Arc<dyn AssetResolver>,
        drm: Arc<dyn DrmProvider>,
        config: SessionConfig,
    ) -> Self {
        Self {
            assets,
            drm,
            config,
        }
    }

    /// Resolve a request into a media source for the given engine variant.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Resolution`] when the source cannot be located
    /// or its decryption session cannot be created. No engine resource is
    /// held on the error path.
    pub fn resolve(
        &self,
        request: &PlaybackRequest,
        variant: EngineVariant,
    ) -> Result<MediaSourceHandle> {
        match request.audio_type {
            AudioType::Network | AudioType::Livestream => Ok(self.resolve_remote(request, variant)),
            AudioType::File => self.resolve_file(request),
            AudioType::Asset => self.resolve_asset(request),
        }
    }

    /// Buffering thresholds for the engine instance serving this request.
    ///
    /// Remote sources on the default variant get enlarged thresholds to
    /// absorb network jitter; adaptive variants manage their own buffering.
    pub fn load_control(&self, audio_type: AudioType, variant: EngineVariant) -> LoadControl {
        if audio_type.is_remote() && variant == EngineVariant::Default {
            LoadControl::enlarged()
        } else {
            LoadControl::default()
        }
    }

    fn resolve_remote(&self, request: &PlaybackRequest, variant: EngineVariant) -> MediaSourceHandle {
        let options = HttpSourceOptions::new(self.config.user_agent.clone())
            .with_headers(request.request_headers.clone())
            .with_timeouts(self.config.connect_timeout, self.config.read_timeout);

        let demuxer = match variant {
            EngineVariant::Hls => DemuxerKind::Hls,
            EngineVariant::Dash => DemuxerKind::Dash,
            EngineVariant::SmoothStreaming => DemuxerKind::SmoothStreaming,
            EngineVariant::Default => DemuxerKind::Progressive {
                constant_bitrate_seeking: true,
            },
        };

        debug!(
            url = %request.source_locator,
            ?demuxer,
            headers = request.request_headers.len(),
            "resolved remote source"
        );

        MediaSourceHandle::new(
            MediaLocation::Http {
                url: request.source_locator.clone(),
                options,
            },
            demuxer,
        )
    }

    fn resolve_file(&self, request: &PlaybackRequest) -> Result<MediaSourceHandle> {
        let path = PathBuf::from(&request.source_locator);
        ensure_readable(&path)?;

        let mut source = MediaSourceHandle::new(
            MediaLocation::FileSystem { path },
            DemuxerKind::Progressive {
                constant_bitrate_seeking: false,
            },
        );

        if let Some(key) = &request.drm_key {
            let session = self
                .drm
                .clear_key_session(key.clone())
                .map_err(|e| SessionError::Resolution(format!("clear-key session: {e}")))?;
            source = source.with_drm(session);
        }

        Ok(source)
    }

    fn resolve_asset(&self, request: &PlaybackRequest) -> Result<MediaSourceHandle> {
        // Logical asset names may contain spaces; the lookup table does not.
        let escaped = request.source_locator.replace(' ', "%20");
        let path = self
            .assets
            .resolve(&escaped, request.asset_package.as_deref())
            .map_err(|e| SessionError::Resolution(format!("asset lookup: {e}")))?;
        ensure_readable(&path)?;

        debug!(asset = %escaped, path = %path.display(), "resolved bundled asset");

        Ok(MediaSourceHandle::new(
            MediaLocation::FileSystem { path },
            DemuxerKind::Progressive {
                constant_bitrate_seeking: false,
            },
        ))
    }
}

fn ensure_readable(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(SessionError::Resolution(format!(
            "no readable file at {}",
            path.display()
        )));
    }
    Ok(())
}
