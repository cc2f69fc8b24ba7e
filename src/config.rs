//! Poller configuration loaded from `statuspoll.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! The `STATUSPOLL_URL` environment variable takes precedence over the file
//! for the status endpoint; CLI flags take precedence over both.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::PollerError;
use crate::strategy::{AdaptivePollingStrategy, DEFAULT_TRANSITION_PROGRESS};

pub const CONFIG_FILE: &str = "statuspoll.toml";
pub const URL_ENV_VAR: &str = "STATUSPOLL_URL";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PollerConfig {
    /// Endpoint answering `GET` with `{status, progress, expectedTime}`.
    #[serde(default = "default_status_url")]
    pub status_url: String,

    /// Progress percentage where backoff switches to decay.
    #[serde(default = "default_transition_progress")]
    pub transition_progress: f64,

    /// Seconds allowed for the TCP/TLS connect of each status request.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Seconds allowed for a whole status request, body included.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Give up after this many seconds. Unset means poll until terminal.
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

// Default endpoint: the local demo job server on port 5001.
fn default_status_url() -> String {
    "http://localhost:5001/status".to_string()
}

fn default_transition_progress() -> f64 {
    DEFAULT_TRANSITION_PROGRESS
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            status_url: default_status_url(),
            transition_progress: default_transition_progress(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            deadline_secs: None,
        }
    }
}

impl PollerConfig {
    /// Loads `statuspoll.toml` from the current directory, falling back to
    /// defaults when it does not exist. Not validated: CLI overrides are
    /// merged first, see [`PollerConfig::with_overrides`].
    pub fn load() -> Result<Self, PollerError> {
        let mut config = Self::load_from(Path::new(CONFIG_FILE))?;

        if let Ok(url) = std::env::var(URL_ENV_VAR) {
            if !url.trim().is_empty() {
                config.status_url = url;
            }
        }

        Ok(config)
    }

    /// Applies CLI flags on top of the file and environment values.
    pub fn with_overrides(
        mut self,
        transition: Option<f64>,
        deadline_secs: Option<u64>,
    ) -> Self {
        if let Some(transition) = transition {
            self.transition_progress = transition;
        }
        if let Some(secs) = deadline_secs {
            self.deadline_secs = Some(secs);
        }
        self
    }

    pub fn load_from(path: &Path) -> Result<Self, PollerError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<PollerConfig>(&contents)?)
    }

    pub fn validate(&self) -> Result<(), PollerError> {
        if !(0.0..=100.0).contains(&self.transition_progress) {
            return Err(PollerError::Config(format!(
                "transition_progress must be within 0..=100, got {}",
                self.transition_progress
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(PollerError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn strategy(&self) -> AdaptivePollingStrategy {
        AdaptivePollingStrategy::with_transition(self.transition_progress)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}
