//! Configuration schema definitions

use crate::category::CategoryTable;
use crate::error::{Error, Result};
use meetpoint_geo::EARTH_RADIUS_M;
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// Centroid and POI discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Map-data service settings
    #[serde(default)]
    pub overpass: OverpassConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.discovery.validate()?;
        self.overpass.validate()?;
        Ok(())
    }
}

/// Discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoveryConfig {
    /// Search and membership radius around the centroid, in meters
    #[serde(default = "default_radius_m")]
    pub radius_m: f64,

    /// Sphere radius used for distances, in meters
    #[serde(default = "default_earth_radius_m")]
    pub earth_radius_m: f64,

    /// Ordered category allow-list
    #[serde(default)]
    pub categories: CategoryTable,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            radius_m: default_radius_m(),
            earth_radius_m: default_earth_radius_m(),
            categories: CategoryTable::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Builder-style method to set the radius
    #[must_use]
    pub fn with_radius_m(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Builder-style method to set the category table
    #[must_use]
    pub fn with_categories(mut self, categories: CategoryTable) -> Self {
        self.categories = categories;
        self
    }

    /// Reject non-positive radii and unusable category tables
    pub fn validate(&self) -> Result<()> {
        if !(self.radius_m.is_finite() && self.radius_m > 0.0) {
            return Err(Error::invalid_value(
                "discovery.radius_m",
                format!("must be a positive number of meters, got {}", self.radius_m),
            ));
        }
        if !(self.earth_radius_m.is_finite() && self.earth_radius_m > 0.0) {
            return Err(Error::invalid_value(
                "discovery.earth_radius_m",
                format!("must be positive, got {}", self.earth_radius_m),
            ));
        }
        self.categories.validate()
    }
}

fn default_radius_m() -> f64 {
    2000.0
}

fn default_earth_radius_m() -> f64 {
    EARTH_RADIUS_M
}

/// Overpass API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverpassConfig {
    /// Interpreter endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Timeout placed in the query itself (enforced by the server)
    #[serde(default = "default_server_timeout_secs")]
    pub server_timeout_secs: u64,

    /// Caller-side bound on the whole request
    #[serde(default = "default_client_timeout_secs")]
    pub client_timeout_secs: u64,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            server_timeout_secs: default_server_timeout_secs(),
            client_timeout_secs: default_client_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl OverpassConfig {
    /// Validate endpoint and timeouts
    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(Error::invalid_value(
                "overpass.endpoint",
                "must start with http:// or https://",
            ));
        }
        if self.server_timeout_secs == 0 || self.client_timeout_secs == 0 {
            return Err(Error::invalid_value("overpass", "timeouts cannot be zero"));
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_server_timeout_secs() -> u64 {
    25
}

fn default_client_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("meetpoint/{}", env!("CARGO_PKG_VERSION"))
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
