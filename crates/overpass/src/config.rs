//! Configuration for the Overpass client
//!
//! Built from the `[overpass]` section of `meetpoint.toml`, with environment
//! overrides for quick switching between public mirrors.

use crate::error::{ApiError, ApiResult};
use meetpoint_core::config::OverpassConfig;
use std::env;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Interpreter endpoint
    pub endpoint: String,
    /// Caller-side bound on a whole request, connect to last body byte
    pub timeout: Duration,
    /// Timeout placed in the query for the server to enforce, in seconds
    pub server_timeout_secs: u64,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_schema(&OverpassConfig::default())
    }
}

impl ClientConfig {
    /// Create configuration from the file schema
    pub fn from_schema(schema: &OverpassConfig) -> Self {
        Self {
            endpoint: schema.endpoint.clone(),
            timeout: Duration::from_secs(schema.client_timeout_secs),
            server_timeout_secs: schema.server_timeout_secs,
            user_agent: schema.user_agent.clone(),
        }
    }

    /// Create configuration from defaults plus environment variables
    ///
    /// Reads the following environment variables:
    /// - `MEETPOINT_OVERPASS_URL`: interpreter endpoint
    /// - `MEETPOINT_TIMEOUT_SECS`: caller-side timeout in seconds
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Apply environment overrides on top of this configuration
    #[must_use]
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = env::var("MEETPOINT_OVERPASS_URL") {
            self.endpoint = url;
        }
        if let Some(timeout) = env::var("MEETPOINT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
        {
            self.timeout = timeout;
        }
        self
    }

    /// Builder-style method to set the endpoint
    #[must_use]
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Builder-style method to set the caller-side timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.endpoint.is_empty() {
            return Err(ApiError::config("endpoint cannot be empty"));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ApiError::InvalidUrl(self.endpoint.clone()));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}
