//! # Session Configuration
//!
//! Tunables for the session controller and source resolver.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SessionError};

/// Crossfade-out behavior when retiring a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FadeConfig {
    /// Volume decrement applied on every tick, as a fraction of full scale.
    ///
    /// Default: 0.05, so a fade from full volume takes 20 ticks.
    #[serde(default = "default_fade_step")]
    pub step: f32,

    /// Interval between fade ticks.
    ///
    /// Default: 250 ms.
    #[serde(default = "default_fade_interval")]
    pub interval: Duration,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            step: default_fade_step(),
            interval: default_fade_interval(),
        }
    }
}

/// Session controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Crossfade-out tuning.
    #[serde(default)]
    pub fade: FadeConfig,

    /// User agent attached to HTTP-backed sources.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Connect timeout for HTTP-backed sources.
    ///
    /// Default: 8 seconds (engine default).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// Read timeout for HTTP-backed sources.
    ///
    /// Default: 8 seconds (engine default).
    #[serde(default = "default_read_timeout")]
    pub read_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fade: FadeConfig::default(),
            user_agent: default_user_agent(),
            connect_timeout: default_connect_timeout(),
            read_timeout: default_read_timeout(),
        }
    }
}

impl SessionConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] when a field is out of range.
    pub fn validate(&self) -> Result<()> {
        if !(self.fade.step > 0.0 && self.fade.step <= 1.0) {
            return Err(SessionError::InvalidConfig(format!(
                "fade step must be in (0.0, 1.0], got {}",
                self.fade.step
            )));
        }
        if self.fade.interval.is_zero() {
            return Err(SessionError::InvalidConfig(
                "fade interval must be non-zero".into(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "user agent must be non-empty".into(),
            ));
        }
        if self.connect_timeout.is_zero() || self.read_timeout.is_zero() {
            return Err(SessionError::InvalidConfig(
                "http timeouts must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

fn default_fade_step() -> f32 {
    0.05
}

fn default_fade_interval() -> Duration {
    Duration::from_millis(250)
}

fn default_user_agent() -> String {
    "core-session".to_string()
}

fn default_connect_timeout() -> Duration {
    bridge_engine::source::DEFAULT_CONNECT_TIMEOUT
}

fn default_read_timeout() -> Duration {
    bridge_engine::source::DEFAULT_READ_TIMEOUT
}
