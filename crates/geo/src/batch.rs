//! Batch distance calculations with optional parallelism.

use crate::{haversine_distance_with_radius, Coordinate};

/// Below this many points the rayon split costs more than it saves.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 256;

/// Distances from `origin` to every point, in the unit of `radius`.
///
/// Output order matches input order.
///
/// # Example
/// ```
/// use meetpoint_geo::{distances_from, Coordinate, EARTH_RADIUS_M};
///
/// let origin = Coordinate::new(0.0, 0.0);
/// let points = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)];
///
/// let distances = distances_from(&origin, &points, EARTH_RADIUS_M);
/// assert_eq!(distances[0], 0.0);
/// assert!((distances[1] - 111_195.0).abs() < 1.0);
/// ```
pub fn distances_from(origin: &Coordinate, points: &[Coordinate], radius: f64) -> Vec<f64> {
    #[cfg(feature = "parallel")]
    {
        if points.len() >= PARALLEL_THRESHOLD {
            use rayon::prelude::*;
            return points
                .par_iter()
                .map(|p| haversine_distance_with_radius(origin, p, radius))
                .collect();
        }
    }

    points
        .iter()
        .map(|p| haversine_distance_with_radius(origin, p, radius))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EARTH_RADIUS_M;

    fn grid(n: usize) -> Vec<Coordinate> {
        (0..n)
            .map(|i| Coordinate::new(-6.0 - (i as f64 * 0.001) % 0.5, 106.8 + (i as f64 * 0.002) % 0.5))
            .collect()
    }

    #[test]
    fn test_preserves_order() {
        let origin = Coordinate::new(-6.2044, 106.8428);
        let points = vec![
            Coordinate::new(-6.2044, 106.8428),
            Coordinate::new(-6.1000, 106.8428),
            Coordinate::new(-6.2000, 106.8428),
        ];
        let d = distances_from(&origin, &points, EARTH_RADIUS_M);
        assert_eq!(d.len(), 3);
        assert_eq!(d[0], 0.0);
        assert!(d[1] > d[2]);
    }

    #[test]
    fn test_large_batch_matches_sequential() {
        let origin = Coordinate::new(-6.2, 106.8);
        let points = grid(1000);
        let batch = distances_from(&origin, &points, EARTH_RADIUS_M);
        for (p, d) in points.iter().zip(&batch) {
            assert_eq!(*d, haversine_distance_with_radius(&origin, p, EARTH_RADIUS_M));
        }
    }

    #[test]
    fn test_empty_batch() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!(distances_from(&origin, &[], EARTH_RADIUS_M).is_empty());
    }
}
