//! Overpass response parsing
//!
//! Elements are decoded one at a time so a single odd element costs only
//! itself. A payload without a top-level `elements` array is malformed as a
//! whole.

use crate::error::ApiResult;
use meetpoint_core::category::CategoryTable;
use meetpoint_core::poi::{FeatureKind, PoiId, PointOfInterest};
use meetpoint_geo::Coordinate;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Placeholder some mappers put in `name`; treated as no name at all.
const PLACEHOLDER_NAME: &str = "unknown";

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<serde_json::Value>,
    /// Set by the server on runtime errors such as hitting its own timeout
    #[serde(default)]
    remark: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<LatLon>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct LatLon {
    lat: f64,
    lon: f64,
}

/// Why an element did not become a POI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    /// Element did not match the expected shape (missing id, non-string tags)
    Malformed,
    /// Kind other than `node` or `way`
    UnsupportedKind,
    /// No usable coordinate for the kind
    MissingCoordinate,
    /// Coordinate present but out of range
    InvalidCoordinate,
    /// Name missing, blank, or the `unknown` placeholder
    Unnamed,
}

/// Parse a raw response body into POIs.
///
/// Fails only when the body as a whole is not an Overpass JSON document.
pub fn parse_response(body: &str, categories: &CategoryTable) -> ApiResult<Vec<PointOfInterest>> {
    let response: OverpassResponse = serde_json::from_str(body)?;

    if let Some(remark) = response.remark.as_deref() {
        warn!(remark, "Overpass returned a remark; results may be partial");
    }

    Ok(parse_elements(&response.elements, categories))
}

/// Convert decoded elements into POIs, dropping unusable ones.
///
/// The first occurrence of a kind-qualified id wins.
pub fn parse_elements(
    elements: &[serde_json::Value],
    categories: &CategoryTable,
) -> Vec<PointOfInterest> {
    let mut seen = HashSet::with_capacity(elements.len());
    let mut pois = Vec::with_capacity(elements.len());
    let mut discarded = 0usize;

    for element in elements {
        match parse_element(element, categories) {
            Ok(poi) => {
                if seen.insert(poi.id) {
                    pois.push(poi);
                }
            }
            Err(reason) => {
                discarded += 1;
                debug!(?reason, id = ?element.get("id"), "Discarding element");
            }
        }
    }

    debug!(kept = pois.len(), discarded, "Parsed Overpass elements");
    pois
}

/// Convert a single element.
pub fn parse_element(
    element: &serde_json::Value,
    categories: &CategoryTable,
) -> Result<PointOfInterest, Discard> {
    let raw = RawElement::deserialize(element).map_err(|_| Discard::Malformed)?;

    let kind = raw.kind.parse::<FeatureKind>().map_err(|_| Discard::UnsupportedKind)?;

    let (lat, lon) = match kind {
        FeatureKind::Node => raw.lat.zip(raw.lon),
        FeatureKind::Way => raw.center.as_ref().map(|c| (c.lat, c.lon)),
    }
    .ok_or(Discard::MissingCoordinate)?;

    let coordinate = Coordinate::try_new(lat, lon).map_err(|_| Discard::InvalidCoordinate)?;

    let name = usable_name(&raw.tags).ok_or(Discard::Unnamed)?;

    Ok(PointOfInterest {
        id: PoiId::new(kind, raw.id),
        coordinate,
        name,
        category: categories.classify(&raw.tags),
        tags: raw.tags,
    })
}

fn usable_name(tags: &BTreeMap<String, String>) -> Option<String> {
    let name = tags.get("name")?.trim();
    if name.is_empty() || name.eq_ignore_ascii_case(PLACEHOLDER_NAME) {
        None
    } else {
        Some(name.to_string())
    }
}
