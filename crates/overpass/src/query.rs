//! Overpass QL query builder
//!
//! One composite query per discovery: a union of `node` and `way` statements,
//! one pair per category rule, all constrained to the same circle.

use meetpoint_core::category::{CategoryRule, CategoryTable};
use meetpoint_core::poi::FeatureKind;
use meetpoint_geo::Coordinate;
use std::fmt;

/// A radius query around a center point
#[derive(Debug, Clone, Copy)]
pub struct OverpassQuery<'a> {
    center: Coordinate,
    radius_m: f64,
    categories: &'a CategoryTable,
    timeout_secs: u64,
}

impl<'a> OverpassQuery<'a> {
    /// Server-side timeout used when none is set
    pub const DEFAULT_TIMEOUT_SECS: u64 = 25;

    /// Build a query for every rule in `categories`
    pub fn new(center: Coordinate, radius_m: f64, categories: &'a CategoryTable) -> Self {
        Self {
            center,
            radius_m,
            categories,
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the `[timeout:N]` the server enforces
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Individual union members, nodes first
    pub fn statements(&self) -> Vec<String> {
        let around = format!(
            "(around:{},{},{})",
            self.radius_m, self.center.latitude, self.center.longitude
        );

        FeatureKind::ALL
            .iter()
            .flat_map(|kind| {
                self.categories
                    .rules()
                    .iter()
                    .map(move |rule| (kind, rule))
            })
            .map(|(kind, rule)| format!("{kind}{}{around};", tag_filter(rule)))
            .collect()
    }

    /// Render the full Overpass QL text
    pub fn to_ql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OverpassQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[out:json][timeout:{}];", self.timeout_secs)?;
        writeln!(f, "(")?;
        for statement in self.statements() {
            writeln!(f, "  {statement}")?;
        }
        writeln!(f, ");")?;
        write!(f, "out center;")
    }
}

fn tag_filter(rule: &CategoryRule) -> String {
    if rule.accepts_any_value() {
        format!("[\"{}\"]", rule.key)
    } else {
        format!("[\"{}\"~\"^({})$\"]", rule.key, rule.values.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Coordinate = Coordinate { latitude: -6.2044, longitude: 106.8428 };

    #[test]
    fn test_default_table_statements() {
        let table = CategoryTable::default();
        let query = OverpassQuery::new(CENTER, 2000.0, &table);
        let statements = query.statements();

        assert_eq!(statements.len(), 10);
        assert_eq!(
            statements[0],
            "node[\"amenity\"~\"^(restaurant|cafe|bar|fast_food|food_court|pub|biergarten)$\"](around:2000,-6.2044,106.8428);"
        );
        assert_eq!(statements[4], "node[\"office\"](around:2000,-6.2044,106.8428);");
        assert!(statements[5].starts_with("way[\"amenity\"~"));
        assert_eq!(statements[9], "way[\"office\"](around:2000,-6.2044,106.8428);");
    }

    #[test]
    fn test_ql_envelope() {
        let table = CategoryTable::default();
        let ql = OverpassQuery::new(CENTER, 2000.0, &table).with_timeout(10).to_ql();

        assert!(ql.starts_with("[out:json][timeout:10];\n(\n"));
        assert!(ql.ends_with(");\nout center;"));
        assert_eq!(ql.matches("(around:2000,").count(), 10);
    }

    #[test]
    fn test_added_category_is_requested() {
        let mut rules = CategoryTable::default().rules().to_vec();
        rules.push(CategoryRule::one_of("amenity_extra", &["coworking_space"]));
        let table = CategoryTable::new(rules);

        let ql = OverpassQuery::new(CENTER, 500.0, &table).to_ql();
        assert!(ql.contains("node[\"amenity_extra\"~\"^(coworking_space)$\"](around:500,"));
        assert!(ql.contains("way[\"amenity_extra\"~\"^(coworking_space)$\"](around:500,"));
    }

    #[test]
    fn test_fractional_radius_kept() {
        let table = CategoryTable::new(vec![CategoryRule::any("office")]);
        let ql = OverpassQuery::new(CENTER, 1250.5, &table).to_ql();
        assert!(ql.contains("(around:1250.5,-6.2044,106.8428)"));
    }
}
