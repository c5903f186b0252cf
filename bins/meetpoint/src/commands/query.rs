//! Query command

use super::discovery_config;
use crate::input::read_participants;
use anyhow::{bail, Result};
use meetpoint_core::config::Config;
use meetpoint_geo::{centroid, sanitize};
use meetpoint_overpass::{ClientConfig, OverpassQuery};
use std::path::Path;

/// Print the Overpass QL for the participants' centroid
pub fn run(config: &Config, path: &Path, radius: Option<f64>, format: &str) -> Result<()> {
    let discovery = discovery_config(config, radius)?;
    let client = ClientConfig::from_schema(&config.schema.overpass).apply_env();

    let sanitized = sanitize(read_participants(path)?);
    let Some(center) = centroid(&sanitized.valid) else {
        bail!("no participant has a valid coordinate");
    };

    let ql = OverpassQuery::new(center, discovery.radius_m, &discovery.categories)
        .with_timeout(client.server_timeout_secs)
        .to_ql();

    if format == "json" {
        let output = serde_json::json!({
            "endpoint": client.endpoint,
            "centroid": center,
            "radius_m": discovery.radius_m,
            "query": ql,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{ql}");
    }
    Ok(())
}
