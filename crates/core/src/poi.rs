//! Point-of-interest types shared by the fetcher, the pipeline, and search

use crate::category::Category;
use crate::error::Error;
use meetpoint_geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Structural kind of a map feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Point-shaped feature with its own coordinate
    Node,
    /// Area-shaped feature located by a service-supplied center
    Way,
}

impl FeatureKind {
    /// Overpass name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
        }
    }

    /// Both kinds, in query order
    pub const ALL: [FeatureKind; 2] = [FeatureKind::Node, FeatureKind::Way];
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "way" => Ok(Self::Way),
            other => Err(Error::invalid_input(format!("unknown feature kind `{other}`"))),
        }
    }
}

/// POI identity: numeric ids are only unique within one feature kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PoiId {
    /// Feature kind
    pub kind: FeatureKind,
    /// Numeric id within the kind
    pub osm_id: i64,
}

impl PoiId {
    /// Create an id
    pub fn new(kind: FeatureKind, osm_id: i64) -> Self {
        Self { kind, osm_id }
    }
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.osm_id)
    }
}

impl From<PoiId> for String {
    fn from(id: PoiId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for PoiId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for PoiId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once('-')
            .ok_or_else(|| Error::invalid_input(format!("malformed POI id `{s}`")))?;
        let osm_id = id
            .parse()
            .map_err(|_| Error::invalid_input(format!("malformed POI id `{s}`")))?;
        Ok(Self::new(kind.parse()?, osm_id))
    }
}

/// A named, categorized place returned by discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Kind-qualified id
    pub id: PoiId,
    /// Point coordinate, or an area's representative center
    pub coordinate: Coordinate,
    /// Non-empty display name
    pub name: String,
    /// Category derived from the tag priority list
    pub category: Category,
    /// All tags as returned by the service
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// A POI with its distance from the centroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPoi {
    /// The place
    #[serde(flatten)]
    pub poi: PointOfInterest,
    /// Great-circle distance from the centroid in meters
    pub distance_m: f64,
}

impl RankedPoi {
    /// Lower-cased name, used for tie-breaking and matching
    pub fn name_key(&self) -> String {
        self.poi.name.to_lowercase()
    }

    /// Ascending distance, then case-insensitive name, then id.
    ///
    /// Total over all POIs, so sorting with it is deterministic.
    pub fn cmp_distance_then_name(&self, other: &Self) -> Ordering {
        self.distance_m
            .total_cmp(&other.distance_m)
            .then_with(|| self.name_key().cmp(&other.name_key()))
            .then_with(|| self.poi.id.cmp(&other.poi.id))
    }
}
