//! Participant centroid.
//!
//! The centroid is the independent arithmetic mean of latitudes and longitudes.
//! This is a planar approximation, fine for participants in one metro area.
//! It is wrong near the poles and across the antimeridian (a group straddling
//! longitude 180 averages to somewhere near 0); callers with such groups need a
//! geodesic replacement behind the same signature.

use crate::{Coordinate, ParticipantLocation};

/// Computes the centroid of a participant set.
///
/// Returns `None` for an empty slice. That is the "no data yet" state and callers
/// skip discovery on it.
pub fn centroid(participants: &[ParticipantLocation]) -> Option<Coordinate> {
    mean(participants.iter().map(|p| p.coordinate))
}

/// Computes the centroid of bare coordinates.
pub fn centroid_of(points: &[Coordinate]) -> Option<Coordinate> {
    mean(points.iter().copied())
}

fn mean(points: impl Iterator<Item = Coordinate>) -> Option<Coordinate> {
    let (count, sum_lat, sum_lon) = points.fold((0usize, 0.0f64, 0.0f64), |(n, lat, lon), c| {
        (n + 1, lat + c.latitude, lon + c.longitude)
    });

    if count == 0 {
        return None;
    }

    let n = count as f64;
    Some(Coordinate::new(sum_lat / n, sum_lon / n))
}

/// Participants split into usable entries and a count of dropped ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sanitized {
    /// Entries with finite, in-range coordinates, in input order
    pub valid: Vec<ParticipantLocation>,
    /// Number of entries dropped for invalid coordinates
    pub excluded: usize,
}

/// Drops participants whose coordinates are non-finite or out of range.
pub fn sanitize(participants: impl IntoIterator<Item = ParticipantLocation>) -> Sanitized {
    let mut out = Sanitized::default();
    for participant in participants {
        if participant.coordinate.is_valid() {
            out.valid.push(participant);
        } else {
            out.excluded += 1;
        }
    }
    out
}

/// Axis-aligned latitude/longitude bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Bounds of a coordinate set, `None` when empty.
    pub fn of(points: &[Coordinate]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lon: first.longitude,
            max_lon: first.longitude,
        };
        Some(points[1..].iter().fold(init, |b, c| Self {
            min_lat: b.min_lat.min(c.latitude),
            max_lat: b.max_lat.max(c.latitude),
            min_lon: b.min_lon.min(c.longitude),
            max_lon: b.max_lon.max(c.longitude),
        }))
    }

    /// Inclusive containment check.
    pub fn contains(&self, coord: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.latitude)
            && (self.min_lon..=self.max_lon).contains(&coord.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_has_no_centroid() {
        assert!(centroid(&[]).is_none());
        assert!(centroid_of(&[]).is_none());
    }

    #[test]
    fn test_two_points_on_equator() {
        let c = centroid_of(&[Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 2.0)]).unwrap();
        assert_eq!(c, Coordinate::new(0.0, 1.0));
    }

    #[test]
    fn test_jakarta_pair() {
        let participants = vec![
            ParticipantLocation::new(-6.2088, 106.8456),
            ParticipantLocation::new(-6.2000, 106.8400).with_address("Senayan"),
        ];
        let c = centroid(&participants).unwrap();
        assert!((c.latitude - -6.2044).abs() < 1e-4);
        assert!((c.longitude - 106.8428).abs() < 1e-4);
    }

    #[test]
    fn test_single_participant_is_its_own_centroid() {
        let only = ParticipantLocation::new(51.5074, -0.1278);
        assert_eq!(centroid(&[only.clone()]), Some(only.coordinate));
    }

    #[test]
    fn test_sanitize_drops_invalid() {
        let result = sanitize(vec![
            ParticipantLocation::new(-6.2, 106.8),
            ParticipantLocation::new(f64::NAN, 106.8),
            ParticipantLocation::new(-6.2, 200.0),
            ParticipantLocation::new(-6.3, 106.9),
        ]);
        assert_eq!(result.valid.len(), 2);
        assert_eq!(result.excluded, 2);
        assert_eq!(result.valid[1].coordinate, Coordinate::new(-6.3, 106.9));
    }

    fn coords() -> impl Strategy<Value = Vec<Coordinate>> {
        prop::collection::vec(
            (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon)),
            1..32,
        )
    }

    proptest! {
        #[test]
        fn prop_centroid_within_bounding_box(points in coords()) {
            let c = centroid_of(&points).unwrap();
            let bounds = BoundingBox::of(&points).unwrap();
            // Mean of floats can overshoot the max by an ulp or so.
            let eps = 1e-9;
            prop_assert!(c.latitude >= bounds.min_lat - eps && c.latitude <= bounds.max_lat + eps);
            prop_assert!(c.longitude >= bounds.min_lon - eps && c.longitude <= bounds.max_lon + eps);
        }
    }
}
