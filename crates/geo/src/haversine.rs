//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes.

use crate::Coordinate;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in meters.
///
/// NaN inputs yield NaN; validating coordinates is the caller's job.
///
/// # Example
/// ```
/// use meetpoint_geo::{haversine_distance_meters, Coordinate};
///
/// let berlin = Coordinate::new(52.5200, 13.4050);
/// let paris = Coordinate::new(48.8566, 2.3522);
///
/// let distance = haversine_distance_meters(&berlin, &paris);
/// assert!((distance - 878_000.0).abs() < 10_000.0);
/// ```
#[inline]
pub fn haversine_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_M)
}

/// Great-circle distance on a sphere of the given radius.
///
/// The result is in the unit of `radius`.
#[inline]
pub fn haversine_distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BERLIN: Coordinate = Coordinate { latitude: 52.5200, longitude: 13.4050 };
    const PARIS: Coordinate = Coordinate { latitude: 48.8566, longitude: 2.3522 };
    const MONAS: Coordinate = Coordinate { latitude: -6.2088, longitude: 106.8456 };
    const SENAYAN: Coordinate = Coordinate { latitude: -6.2000, longitude: 106.8400 };

    #[test]
    fn test_berlin_to_paris() {
        let distance = haversine_distance_meters(&BERLIN, &PARIS);
        // ~878 km
        assert!((distance - 878_000.0).abs() < 5_000.0, "Berlin-Paris: {}", distance);
    }

    #[test]
    fn test_jakarta_fixture_meters() {
        let distance = haversine_distance_meters(&MONAS, &SENAYAN);
        assert!((distance - 1157.9).abs() < 1.0, "Jakarta pair: {}", distance);
    }

    #[test]
    fn test_same_point_zero_distance() {
        assert_eq!(haversine_distance_meters(&MONAS, &MONAS), 0.0);
    }

    #[test]
    fn test_nan_propagates() {
        let broken = Coordinate::new(f64::NAN, 106.0);
        assert!(haversine_distance_meters(&broken, &MONAS).is_nan());
    }

    #[test]
    fn test_custom_radius_scales_linearly() {
        let unit = haversine_distance_with_radius(&MONAS, &SENAYAN, 1.0);
        let earth = haversine_distance_with_radius(&MONAS, &SENAYAN, EARTH_RADIUS_M);
        assert!((unit * EARTH_RADIUS_M - earth).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_distance_is_symmetric(
            lat1 in -90.0f64..=90.0, lon1 in -180.0f64..=180.0,
            lat2 in -90.0f64..=90.0, lon2 in -180.0f64..=180.0,
        ) {
            let a = Coordinate::new(lat1, lon1);
            let b = Coordinate::new(lat2, lon2);
            let d1 = haversine_distance_meters(&a, &b);
            let d2 = haversine_distance_meters(&b, &a);
            prop_assert!(d1 >= 0.0);
            prop_assert!((d1 - d2).abs() < 1e-6);
        }
    }
}
