//! CLI command implementations

pub mod centroid;
pub mod discover;
pub mod query;

use anyhow::Result;
use meetpoint_core::config::{Config, DiscoveryConfig};

/// Discovery settings from the config file, with a CLI radius override
pub fn discovery_config(config: &Config, radius: Option<f64>) -> Result<DiscoveryConfig> {
    let mut discovery = config.schema.discovery.clone();
    if let Some(radius_m) = radius {
        discovery = discovery.with_radius_m(radius_m);
    }
    discovery.validate()?;
    Ok(discovery)
}
