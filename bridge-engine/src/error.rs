use thiserror::Error;

/// Raw failure surface of a native playback engine.
///
/// Variants keep enough structure for the session core to classify failures
/// (network-unreachable vs. transient network vs. engine fault) without
/// parsing vendor strings beyond what the engine itself reports.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The HTTP data source received a non-success response code.
    #[error("invalid response code {status} for {url}")]
    InvalidResponseCode { status: u16, url: String },

    /// Transport-layer failure (DNS, TLS, socket, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// DRM session could not be created or refused the content.
    #[error("drm session error: {0}")]
    Drm(String),

    /// The engine rejected the source or failed internally.
    #[error("engine fault: {0}")]
    Engine(String),

    /// I/O error while opening a local source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
