//! The seam between discovery sessions and the map-data service

use meetpoint_core::category::CategoryTable;
use meetpoint_core::poi::PointOfInterest;
use meetpoint_geo::Coordinate;
use std::future::Future;
use std::sync::Arc;

/// Anything that can list POIs around a point.
///
/// Implementations never fail: an unavailable service yields an empty list.
pub trait PoiSource: Send + Sync {
    /// Fetch POIs within `radius_m` of `center` matching `categories`
    fn fetch(
        &self,
        center: Coordinate,
        radius_m: f64,
        categories: &CategoryTable,
    ) -> impl Future<Output = Vec<PointOfInterest>> + Send;
}

impl<T: PoiSource> PoiSource for Arc<T> {
    fn fetch(
        &self,
        center: Coordinate,
        radius_m: f64,
        categories: &CategoryTable,
    ) -> impl Future<Output = Vec<PointOfInterest>> + Send {
        (**self).fetch(center, radius_m, categories)
    }
}
