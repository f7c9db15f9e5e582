//! Session client configuration.
//!
//! Stored as TOML, for example:
//!
//! ```toml
//! connect_timeout_secs = 120
//! disconnect_timeout_secs = 10
//! message_ttl_secs = 300
//! channel_capacity = 32
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tonconnect_protocol::constants::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_CONNECT_TIMEOUT, DEFAULT_DISCONNECT_TIMEOUT,
    DEFAULT_MESSAGE_TTL,
};

/// Errors from loading a [`SessionConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Tunables for [`SessionClient`](crate::SessionClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Deadline for the connect handshake. `None` or `0` waits until cancelled.
    pub connect_timeout_secs: Option<u64>,
    /// Deadline for the disconnect handshake. `None` or `0` waits until cancelled.
    pub disconnect_timeout_secs: Option<u64>,
    /// TTL attached to outgoing messages unless the caller overrides it.
    pub message_ttl_secs: u64,
    /// Capacity of the channel all bridge subscriptions feed into.
    pub channel_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: Some(DEFAULT_CONNECT_TIMEOUT.as_secs()),
            disconnect_timeout_secs: Some(DEFAULT_DISCONNECT_TIMEOUT.as_secs()),
            message_ttl_secs: DEFAULT_MESSAGE_TTL.as_secs(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads configuration from `path`, or the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no session config, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), ?config, "session config loaded");
        Ok(config)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        deadline(self.connect_timeout_secs)
    }

    pub fn disconnect_timeout(&self) -> Option<Duration> {
        deadline(self.disconnect_timeout_secs)
    }

    pub fn message_ttl(&self) -> Duration {
        Duration::from_secs(self.message_ttl_secs)
    }

    /// Channel capacity, never below one.
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }
}

fn deadline(secs: Option<u64>) -> Option<Duration> {
    secs.filter(|&s| s > 0).map(Duration::from_secs)
}
