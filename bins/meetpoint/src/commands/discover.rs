//! Discover command

use super::discovery_config;
use crate::input::read_participants;
use anyhow::{Context, Result};
use meetpoint_core::config::Config;
use meetpoint_core::poi::RankedPoi;
use meetpoint_engine::{format_distance, CategoryGroup, DiscoveryResult, DiscoverySession, SessionOutcome};
use meetpoint_overpass::{ClientConfig, OverpassClient};
use meetpoint_search::normalize_query;
use owo_colors::OwoColorize;
use std::path::Path;

/// Run one discovery cycle and print the grouped places
pub async fn run(
    config: &Config,
    path: &Path,
    query: Option<&str>,
    radius: Option<f64>,
    format: &str,
) -> Result<()> {
    let discovery = discovery_config(config, radius)?;
    let query = match query {
        Some(raw) => normalize_query(raw).context("Invalid --query")?,
        None => None,
    };

    let client = OverpassClient::with_config(
        ClientConfig::from_schema(&config.schema.overpass).apply_env(),
    )?;
    let session = DiscoverySession::new(client, discovery)?;
    let participants = read_participants(path)?;

    let result = match session.refresh(participants).await {
        SessionOutcome::Applied(result) => result,
        SessionOutcome::DataInsufficient => {
            if format == "json" {
                println!("{}", serde_json::json!({ "status": "data_insufficient" }));
            } else {
                println!("{}", "No valid participant locations; nothing to discover.".yellow());
            }
            return Ok(());
        }
        SessionOutcome::Stale { .. } | SessionOutcome::Closed => return Ok(()),
    };

    let query = query.as_deref();
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&json_report(&result, query))?);
        return Ok(());
    }

    print_text(&result, query);
    Ok(())
}

/// Places matching `query`, best tier first; empty without a query
fn best_matches(result: &DiscoveryResult, query: Option<&str>) -> Vec<RankedPoi> {
    query.map(|q| result.search(q)).unwrap_or_default()
}

fn json_report(result: &DiscoveryResult, query: Option<&str>) -> serde_json::Value {
    let groups = match query {
        Some(q) => result.filtered_groups(q),
        None => result.groups.clone(),
    };
    let total_pois = groups.iter().map(|g| g.pois.len()).sum();
    serde_json::json!({
        "status": "ok",
        "query": query,
        "matches": query.map(|q| result.search(q)),
        "result": DiscoveryResult { groups, total_pois, ..result.clone() },
        "metrics": meetpoint_telemetry::metrics().snapshot(),
    })
}

fn print_text(result: &DiscoveryResult, query: Option<&str>) {
    println!();
    println!("  {}", result.summary().bold());
    println!(
        "  {} {:.6}, {:.6}",
        "Meeting point:".dimmed(),
        result.centroid.latitude,
        result.centroid.longitude
    );
    if result.excluded_participants > 0 {
        println!(
            "  {}",
            format!(
                "{} participant(s) skipped for invalid coordinates",
                result.excluded_participants
            )
            .yellow()
        );
    }
    println!();

    for participant in &result.participants {
        let marker = if participant.within_radius {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };
        let who = participant.participant.address.as_deref().unwrap_or("participant");
        println!("  {marker} {who:<32} {}", format_distance(participant.distance_m).dimmed());
    }

    match query {
        Some(q) => print_matches(q, &best_matches(result, Some(q))),
        None => print_groups(&result.groups),
    }
    println!();
}

fn print_matches(query: &str, matches: &[RankedPoi]) {
    println!();
    if matches.is_empty() {
        println!("  {}", format!("No places match \"{query}\".").yellow());
        return;
    }
    println!("  {} ({})", format!("Best matches for \"{query}\"").cyan().bold(), matches.len());
    for poi in matches {
        println!(
            "    {:<40} {:<20} {}",
            poi.poi.name,
            poi.poi.category.label().dimmed(),
            format_distance(poi.distance_m).dimmed()
        );
    }
}

fn print_groups(groups: &[CategoryGroup]) {
    if groups.is_empty() {
        println!();
        println!("  {}", "No places found.".yellow());
        return;
    }
    for group in groups {
        println!();
        println!("  {} ({})", group.label.cyan().bold(), group.pois.len());
        for poi in &group.pois {
            println!(
                "    {:<40} {}",
                poi.poi.name,
                format_distance(poi.distance_m).dimmed()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetpoint_core::category::Category;
    use meetpoint_core::config::DiscoveryConfig;
    use meetpoint_core::poi::{FeatureKind, PoiId, PointOfInterest};
    use meetpoint_engine::aggregate;
    use meetpoint_geo::Coordinate;
    use std::collections::BTreeMap;

    const CENTROID: Coordinate = Coordinate { latitude: -6.2044, longitude: 106.8428 };

    fn place(id: i64, name: &str, category: Category, lat_offset: f64) -> PointOfInterest {
        PointOfInterest {
            id: PoiId::new(FeatureKind::Node, id),
            coordinate: Coordinate::new(CENTROID.latitude + lat_offset, CENTROID.longitude),
            name: name.to_string(),
            category,
            tags: BTreeMap::new(),
        }
    }

    fn kopi_result() -> DiscoveryResult {
        let pois = vec![
            place(1, "Kopi Kenangan", Category::tagged("amenity", "cafe"), 0.005),
            place(2, "Toko Kopi", Category::tagged("shop", "coffee"), 0.001),
            place(3, "Sate Khas Senayan", Category::tagged("amenity", "restaurant"), 0.0005),
        ];
        aggregate(CENTROID, &DiscoveryConfig::default(), pois, &[])
    }

    #[test]
    fn test_best_matches_keep_tier_order() {
        let result = kopi_result();
        let names: Vec<String> = best_matches(&result, Some("kopi")).into_iter().map(|p| p.poi.name).collect();
        assert_eq!(names, vec!["Kopi Kenangan", "Toko Kopi"]);
        assert!(best_matches(&result, None).is_empty());
    }

    #[test]
    fn test_json_report_lists_ranked_matches() {
        let result = kopi_result();

        let report = json_report(&result, Some("kopi"));
        assert_eq!(report["matches"][0]["name"], "Kopi Kenangan");
        assert_eq!(report["matches"][1]["name"], "Toko Kopi");
        assert_eq!(report["result"]["total_pois"], 2);

        let report = json_report(&result, None);
        assert!(report["matches"].is_null());
        assert_eq!(report["result"]["total_pois"], 3);
    }
}
