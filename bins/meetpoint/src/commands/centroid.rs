//! Centroid command

use crate::input::read_participants;
use anyhow::{bail, Result};
use meetpoint_geo::{centroid, sanitize};
use owo_colors::OwoColorize;
use std::path::Path;

/// Print the centroid of the valid participants
pub fn run(path: &Path, format: &str) -> Result<()> {
    let sanitized = sanitize(read_participants(path)?);
    let Some(center) = centroid(&sanitized.valid) else {
        bail!("no participant has a valid coordinate");
    };

    if format == "json" {
        let output = serde_json::json!({
            "centroid": center,
            "participants": sanitized.valid.len(),
            "excluded_participants": sanitized.excluded,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {:.6}, {:.6}",
        "Centroid:".bold(),
        center.latitude,
        center.longitude
    );
    println!("  from {} participant location(s)", sanitized.valid.len());
    if sanitized.excluded > 0 {
        println!(
            "  {}",
            format!("{} skipped for invalid coordinates", sanitized.excluded).yellow()
        );
    }
    Ok(())
}
