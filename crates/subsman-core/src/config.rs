// ── Runtime connection configuration ──
//
// Describes *where* the backend lives and how long to wait for it.
// The CLI/TUI builds a `ClientConfig` from the config file and flags;
// core never reads config files.

use std::time::Duration;

use subsman_api::transport::DEFAULT_TIMEOUT;
use subsman_api::{ApiClient, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// Backend URL used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3355";

/// Configuration for talking to one SubsManager backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root URL (e.g., `http://localhost:3355`).
    pub url: Url,
    /// Per-request timeout. Node tests can take a while on large pools.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Parse a URL string into a config with the default timeout.
    pub fn from_url(url: &str) -> Result<Self, CoreError> {
        let url = Url::parse(url).map_err(|e| CoreError::Config {
            message: format!("Invalid backend URL '{url}': {e}"),
        })?;
        Ok(Self {
            url,
            ..Self::default()
        })
    }

    /// Build the HTTP client described by this config.
    pub fn build_api_client(&self) -> Result<ApiClient, CoreError> {
        let transport = TransportConfig::default().with_timeout(self.timeout);
        Ok(ApiClient::new(self.url.clone(), &transport)?)
    }
}

fn default_url() -> Url {
    Url::parse(DEFAULT_BACKEND_URL).expect("DEFAULT_BACKEND_URL is a valid URL")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.url.as_str(), "http://localhost:3355/");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn from_url_rejects_relative_paths() {
        let err = ClientConfig::from_url("/api").unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
