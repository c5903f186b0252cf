//! Tiered name/label filtering.

use crate::error::{Result, SearchError};
use meetpoint_core::poi::RankedPoi;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Longest query accepted by [`normalize_query`], in characters
pub const MAX_QUERY_CHARS: usize = 256;

/// Match quality levels.
///
/// Ordered so that a better match compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    /// Query occurs somewhere in the name or the category label
    Substring = 20,
    /// Name starts with query
    Prefix = 40,
    /// Name equals query
    Exact = 50,
}

impl MatchTier {
    /// Numeric score (higher is better)
    pub fn score(self) -> u32 {
        self as u32
    }
}

/// Validate and normalize user input.
///
/// Returns `Ok(None)` for a blank query, meaning "no filter".
pub fn normalize_query(raw: &str) -> Result<Option<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_QUERY_CHARS {
        return Err(SearchError::InvalidQuery(format!(
            "longer than {MAX_QUERY_CHARS} characters"
        )));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(SearchError::InvalidQuery("contains control characters".to_string()));
    }
    Ok(Some(trimmed.to_lowercase()))
}

/// Classify how `poi` matches `query`.
///
/// `query` is compared case-insensitively after trimming. A blank query
/// matches nothing here; callers treat it as "no filter" instead.
pub fn match_tier(poi: &RankedPoi, query: &str) -> Option<MatchTier> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    tier_for(poi, &needle)
}

fn tier_for(poi: &RankedPoi, needle: &str) -> Option<MatchTier> {
    let name = poi.name_key();

    if name == needle {
        Some(MatchTier::Exact)
    } else if name.starts_with(needle) {
        Some(MatchTier::Prefix)
    } else if name.contains(needle) || poi.poi.category.label().to_lowercase().contains(needle) {
        Some(MatchTier::Substring)
    } else {
        None
    }
}

/// Filter and rank places by `query`.
///
/// Non-matches are dropped. Within a tier, places keep the distance-then-name
/// order. A blank query returns every place in that order.
pub fn filter(pois: &[RankedPoi], query: &str) -> Vec<RankedPoi> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return sort_by_distance_then_name(pois);
    }

    let mut matched: Vec<(MatchTier, &RankedPoi)> = pois
        .iter()
        .filter_map(|poi| tier_for(poi, &needle).map(|tier| (tier, poi)))
        .collect();

    matched.sort_by(|(tier_a, a), (tier_b, b)| {
        Reverse(*tier_a)
            .cmp(&Reverse(*tier_b))
            .then_with(|| a.cmp_distance_then_name(b))
    });

    matched.into_iter().map(|(_, poi)| poi.clone()).collect()
}

/// All places ascending by distance, ties broken by name then id.
pub fn sort_by_distance_then_name(pois: &[RankedPoi]) -> Vec<RankedPoi> {
    let mut sorted = pois.to_vec();
    sorted.sort_by(RankedPoi::cmp_distance_then_name);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetpoint_core::category::Category;
    use meetpoint_core::poi::{FeatureKind, PoiId, PointOfInterest};
    use meetpoint_geo::Coordinate;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn place(id: i64, name: &str, category: Category, distance_m: f64) -> RankedPoi {
        RankedPoi {
            poi: PointOfInterest {
                id: PoiId::new(FeatureKind::Node, id),
                coordinate: Coordinate::new(-6.2, 106.8),
                name: name.to_string(),
                category,
                tags: BTreeMap::new(),
            },
            distance_m,
        }
    }

    fn cafe(id: i64, name: &str, distance_m: f64) -> RankedPoi {
        place(id, name, Category::tagged("amenity", "cafe"), distance_m)
    }

    fn names(pois: &[RankedPoi]) -> Vec<&str> {
        pois.iter().map(|p| p.poi.name.as_str()).collect()
    }

    #[test]
    fn test_tiers_rank_before_distance() {
        let pois = vec![
            cafe(1, "Kopi Kenangan", 100.0),
            cafe(2, "Kopi", 900.0),
            cafe(3, "Toko Kopi Tuku", 50.0),
            cafe(4, "Warung Sate", 10.0),
        ];

        let result = filter(&pois, "  KOPI ");
        assert_eq!(names(&result), vec!["Kopi", "Kopi Kenangan", "Toko Kopi Tuku"]);
    }

    #[test]
    fn test_match_tier_levels() {
        let exact = cafe(1, "Kopi", 0.0);
        let prefix = cafe(2, "Kopi Kenangan", 0.0);
        let inside = cafe(3, "Toko Kopi", 0.0);
        let label_only = place(4, "Starbucks", Category::tagged("amenity", "cafe"), 0.0);

        assert_eq!(match_tier(&exact, "kopi"), Some(MatchTier::Exact));
        assert_eq!(match_tier(&prefix, "kopi"), Some(MatchTier::Prefix));
        assert_eq!(match_tier(&inside, "kopi"), Some(MatchTier::Substring));
        assert_eq!(match_tier(&label_only, "Café"), None);
        assert_eq!(match_tier(&label_only, "caf"), Some(MatchTier::Substring));
        assert_eq!(match_tier(&label_only, "   "), None);
        assert!(MatchTier::Exact > MatchTier::Prefix);
        assert_eq!(MatchTier::Prefix.score(), 40);
    }

    #[test]
    fn test_label_match_uses_humanized_label() {
        let pois = vec![
            place(1, "Ramen Ya", Category::tagged("amenity", "fast_food"), 300.0),
            place(2, "Burger Bar", Category::tagged("amenity", "restaurant"), 100.0),
        ];
        let result = filter(&pois, "fast food");
        assert_eq!(names(&result), vec!["Ramen Ya"]);
    }

    #[test]
    fn test_ties_within_tier_by_distance_then_name() {
        let pois = vec![
            cafe(1, "Toko Kopi B", 200.0),
            cafe(2, "toko kopi a", 200.0),
            cafe(3, "Rumah Kopi", 100.0),
        ];
        let result = filter(&pois, "kopi");
        assert_eq!(names(&result), vec!["Rumah Kopi", "toko kopi a", "Toko Kopi B"]);
    }

    #[test]
    fn test_blank_query_returns_everything_sorted() {
        let pois = vec![cafe(1, "B", 20.0), cafe(2, "a", 20.0), cafe(3, "C", 5.0)];
        assert_eq!(names(&filter(&pois, "")), vec!["C", "a", "B"]);
        assert_eq!(names(&filter(&pois, " \t")), vec!["C", "a", "B"]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let pois = vec![cafe(1, "Kopi", 20.0)];
        assert!(filter(&pois, "pizza").is_empty());
        assert!(filter(&[], "kopi").is_empty());
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Kopi "), Ok(Some("kopi".to_string())));
        assert_eq!(normalize_query("   "), Ok(None));
        assert!(normalize_query("a\u{7}b").is_err());
        assert!(normalize_query(&"x".repeat(MAX_QUERY_CHARS + 1)).is_err());
    }

    fn arb_place() -> impl Strategy<Value = RankedPoi> {
        (0i64..50, "[a-cA-C ]{1,6}", 0.0f64..3000.0)
            .prop_map(|(id, name, distance)| cafe(id, &name, distance))
    }

    proptest! {
        #[test]
        fn test_filter_idempotent(pois in prop::collection::vec(arb_place(), 0..20), query in "[a-c]{0,2}") {
            let once = filter(&pois, &query);
            let twice = filter(&once, &query);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_filter_only_keeps_matches(pois in prop::collection::vec(arb_place(), 0..20), query in "[a-c]{1,2}") {
            let result = filter(&pois, &query);
            prop_assert!(result.iter().all(|p| match_tier(p, &query).is_some()));
            let expected = pois.iter().filter(|p| match_tier(p, &query).is_some()).count();
            prop_assert_eq!(result.len(), expected);
        }
    }
}
