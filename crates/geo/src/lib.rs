//! Geospatial primitives for Meetpoint.
//!
//! This crate provides:
//! - Haversine distance in meters
//! - Arithmetic centroid of a participant set
//! - Coordinate validation and participant sanitizing
//! - Batch distances with optional parallelism
//!
//! # Example
//!
//! ```
//! use meetpoint_geo::{centroid_of, haversine_distance_meters, Coordinate};
//!
//! let a = Coordinate::new(-6.2088, 106.8456);
//! let b = Coordinate::new(-6.2000, 106.8400);
//!
//! let center = centroid_of(&[a, b]).unwrap();
//! assert!((center.latitude - -6.2044).abs() < 1e-4);
//!
//! let meters = haversine_distance_meters(&a, &b);
//! assert!((meters - 1158.0).abs() < 12.0);
//! ```

mod centroid;
mod error;
mod haversine;
pub mod batch;

pub use batch::distances_from;
pub use centroid::{centroid, centroid_of, sanitize, BoundingBox, Sanitized};
pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{haversine_distance_meters, haversine_distance_with_radius, EARTH_RADIUS_M};

use serde::{Deserialize, Serialize};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate without validation.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "({latitude}, {longitude}) is outside [-90, 90] x [-180, 180]"
            )))
        }
    }

    /// Returns true if both values are finite and within range.
    ///
    /// NaN fails every comparison, so it is rejected by the range checks.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// A participant's resolved position, as supplied by the address resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantLocation {
    /// Resolved coordinate
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// Display address, if the resolver kept one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ParticipantLocation {
    /// Creates a participant location without an address.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinate: Coordinate::new(latitude, longitude),
            address: None,
        }
    }

    /// Attaches a display address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}
