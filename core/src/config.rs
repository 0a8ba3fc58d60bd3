//! Client configuration.
//!
//! Deserializable with serde so callers can load it from whatever format
//! they keep settings in; `from_env` covers the common case.

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::transport::{DEFAULT_PORT, DEFAULT_TIMEOUT};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Gateway endpoint, e.g. `http://localhost:4010`.
    pub server: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: format!("http://localhost:{DEFAULT_PORT}"),
            username: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ClientConfig {
    /// Read `SMS_SERVER`, `SMS_USERNAME`, `SMS_PASSWORD` and
    /// `SMS_TIMEOUT_SECS`, keeping defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: env::var("SMS_SERVER").unwrap_or(defaults.server),
            username: env::var("SMS_USERNAME").ok(),
            password: env::var("SMS_PASSWORD").ok(),
            timeout_secs: env::var("SMS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
