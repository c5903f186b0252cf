//! Aggregation and ranking of discovered places.

use meetpoint_core::config::DiscoveryConfig;
use meetpoint_core::poi::{PointOfInterest, RankedPoi};
use meetpoint_geo::{distances_from, Coordinate, ParticipantLocation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A participant with its distance to the centroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantStatus {
    /// The participant as supplied
    #[serde(flatten)]
    pub participant: ParticipantLocation,
    /// Great-circle distance to the centroid in meters
    pub distance_m: f64,
    /// `distance_m <= radius_m`
    pub within_radius: bool,
}

/// Places sharing one category, nearest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    /// Grouping key (tag value, or `other`)
    pub category: String,
    /// Display label for the key
    pub label: String,
    /// Members in distance-then-name order; never empty
    pub pois: Vec<RankedPoi>,
}

impl CategoryGroup {
    /// Distance of the nearest member
    pub fn nearest_m(&self) -> Option<f64> {
        self.pois.first().map(|p| p.distance_m)
    }
}

/// Everything one discovery cycle produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    /// Mean participant position
    pub centroid: Coordinate,
    /// Radius used for the query and membership, in meters
    pub radius_m: f64,
    /// Category groups, ordered by their nearest member
    pub groups: Vec<CategoryGroup>,
    /// Valid participants in input order
    pub participants: Vec<ParticipantStatus>,
    /// Number of places across all groups
    pub total_pois: usize,
    /// Participants dropped for invalid coordinates
    #[serde(default)]
    pub excluded_participants: usize,
}

impl DiscoveryResult {
    /// All places across groups, in distance-then-name order
    pub fn flatten(&self) -> Vec<RankedPoi> {
        let mut all: Vec<RankedPoi> = self.groups.iter().flat_map(|g| g.pois.iter().cloned()).collect();
        all.sort_by(RankedPoi::cmp_distance_then_name);
        all
    }

    /// Places matching `query`, best match first
    pub fn search(&self, query: &str) -> Vec<RankedPoi> {
        meetpoint_search::filter(&self.flatten(), query)
    }

    /// Groups rebuilt from the places matching `query`.
    ///
    /// A blank query yields the unfiltered groups.
    pub fn filtered_groups(&self, query: &str) -> Vec<CategoryGroup> {
        if query.trim().is_empty() {
            return self.groups.clone();
        }
        let mut matched = meetpoint_search::filter(&self.flatten(), query);
        matched.sort_by(RankedPoi::cmp_distance_then_name);
        group_by_category(matched)
    }

    /// Group for a category key
    pub fn group(&self, category: &str) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.category == category)
    }

    /// Participants outside the radius
    pub fn outside_radius(&self) -> impl Iterator<Item = &ParticipantStatus> {
        self.participants.iter().filter(|p| !p.within_radius)
    }

    /// One-line description of the result
    pub fn summary(&self) -> String {
        format!(
            "Found {} participant location(s) and {} places within {:.1} km",
            self.participants.len(),
            self.total_pois,
            self.radius_m / 1000.0
        )
    }
}

/// Format meters as kilometers with two decimals: `900.0` becomes `0.90 km`.
pub fn format_distance(meters: f64) -> String {
    format!("{:.2} km", meters / 1000.0)
}

/// Build a [`DiscoveryResult`] around `centroid`.
///
/// Places without a valid coordinate are dropped. An empty place list gives
/// a result with no groups. `excluded_participants` is left at zero for the
/// caller to fill in.
pub fn aggregate(
    centroid: Coordinate,
    config: &DiscoveryConfig,
    pois: Vec<PointOfInterest>,
    participants: &[ParticipantLocation],
) -> DiscoveryResult {
    let ranked = rank(centroid, pois, config.earth_radius_m);
    let participants = radius_membership(centroid, participants, config);
    let total_pois = ranked.len();
    let groups = group_by_category(ranked);

    debug!(
        groups = groups.len(),
        total_pois,
        participants = participants.len(),
        "Aggregated discovery result"
    );

    DiscoveryResult {
        centroid,
        radius_m: config.radius_m,
        groups,
        participants,
        total_pois,
        excluded_participants: 0,
    }
}

/// Attach distances and sort ascending, ties by name then id.
pub fn rank(centroid: Coordinate, pois: Vec<PointOfInterest>, earth_radius_m: f64) -> Vec<RankedPoi> {
    let pois: Vec<PointOfInterest> = pois.into_iter().filter(|p| p.coordinate.is_valid()).collect();
    let points: Vec<Coordinate> = pois.iter().map(|p| p.coordinate).collect();
    let distances = distances_from(&centroid, &points, earth_radius_m);

    let mut ranked: Vec<RankedPoi> = pois
        .into_iter()
        .zip(distances)
        .map(|(poi, distance_m)| RankedPoi { poi, distance_m })
        .collect();
    ranked.sort_by(RankedPoi::cmp_distance_then_name);
    ranked
}

/// Distance and radius flag for every participant, in input order.
pub fn radius_membership(
    centroid: Coordinate,
    participants: &[ParticipantLocation],
    config: &DiscoveryConfig,
) -> Vec<ParticipantStatus> {
    let points: Vec<Coordinate> = participants.iter().map(|p| p.coordinate).collect();
    let distances = distances_from(&centroid, &points, config.earth_radius_m);

    participants
        .iter()
        .zip(distances)
        .map(|(participant, distance_m)| ParticipantStatus {
            participant: participant.clone(),
            distance_m,
            within_radius: distance_m <= config.radius_m,
        })
        .collect()
}

/// Split sorted places into category groups.
///
/// Input order is kept inside each group, so a sorted input yields groups
/// ordered by their nearest member.
pub fn group_by_category(ranked: Vec<RankedPoi>) -> Vec<CategoryGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for poi in ranked {
        let key = poi.poi.category.group_key();
        match index.get(key) {
            Some(&i) => groups[i].pois.push(poi),
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(CategoryGroup {
                    category: key.to_string(),
                    label: poi.poi.category.label(),
                    pois: vec![poi],
                });
            }
        }
    }

    groups
}
