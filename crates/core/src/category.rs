//! Category allow-list and classification
//!
//! One ordered [`CategoryTable`] drives both sides of discovery: the Overpass
//! query requests exactly its rules, and a fetched feature is grouped under the
//! first rule key present on its tags. Rule order is priority order.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Group key used when no rule key is present on a feature.
pub const OTHER: &str = "other";

/// One tag key and the values requested for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// OSM tag key, e.g. `amenity`
    pub key: String,
    /// Accepted values; empty means any value
    #[serde(default)]
    pub values: Vec<String>,
}

impl CategoryRule {
    /// Rule accepting only the listed values
    pub fn one_of(key: &str, values: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    /// Rule accepting any value of `key`
    pub fn any(key: &str) -> Self {
        Self {
            key: key.to_string(),
            values: Vec::new(),
        }
    }

    /// True when every value of the key is requested
    pub fn accepts_any_value(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered allow-list of tag rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(vec![
            CategoryRule::one_of(
                "amenity",
                &["restaurant", "cafe", "bar", "fast_food", "food_court", "pub", "biergarten"],
            ),
            CategoryRule::one_of("shop", &["mall", "supermarket", "convenience", "department_store"]),
            CategoryRule::one_of(
                "leisure",
                &["park", "garden", "sports_centre", "fitness_centre", "cinema"],
            ),
            CategoryRule::one_of("tourism", &["hotel", "attraction", "museum", "gallery"]),
            CategoryRule::any("office"),
        ])
    }
}

impl CategoryTable {
    /// Build a table from rules in priority order
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Rules in priority order
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Classify a feature by its tags.
    ///
    /// The first rule key carrying a non-blank value wins, whether or not that
    /// value is in the rule's list: a feature fetched for `shop=mall` that is
    /// also tagged `amenity=bank` groups under `bank`.
    pub fn classify(&self, tags: &BTreeMap<String, String>) -> Category {
        self.rules
            .iter()
            .find_map(|rule| {
                tags.get(&rule.key)
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(|v| Category::tagged(&rule.key, v))
            })
            .unwrap_or_else(Category::other)
    }

    /// Reject tables that could not be rendered into a safe query
    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(Error::invalid_value(
                "discovery.categories",
                "at least one category rule is required",
            ));
        }

        for rule in &self.rules {
            if !is_tag_token(&rule.key) {
                return Err(Error::invalid_value(
                    "discovery.categories.key",
                    format!("`{}` is not a valid tag key", rule.key),
                ));
            }
            if let Some(bad) = rule.values.iter().find(|v| !is_tag_token(v)) {
                return Err(Error::invalid_value(
                    "discovery.categories.values",
                    format!("`{bad}` is not a valid value for `{}`", rule.key),
                ));
            }
        }

        let mut keys: Vec<&str> = self.rules.iter().map(|r| r.key.as_str()).collect();
        keys.sort_unstable();
        if let Some(pair) = keys.windows(2).find(|w| w[0] == w[1]) {
            return Err(Error::invalid_value(
                "discovery.categories.key",
                format!("`{}` appears more than once", pair[0]),
            ));
        }

        Ok(())
    }
}

/// Tag keys and values are embedded in quoted query strings and regexes.
fn is_tag_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':' || c == '-')
}

/// A feature's category: the winning tag key and its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Tag key that produced the category, `None` for the fallback group
    pub tag: Option<String>,
    /// Tag value, or [`OTHER`]
    pub value: String,
}

impl Category {
    /// Category from a tag key and value
    pub fn tagged(tag: &str, value: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            value: value.to_string(),
        }
    }

    /// The fallback category
    pub fn other() -> Self {
        Self {
            tag: None,
            value: OTHER.to_string(),
        }
    }

    /// True for the fallback category
    pub fn is_other(&self) -> bool {
        self.tag.is_none()
    }

    /// Key the category is grouped under
    pub fn group_key(&self) -> &str {
        &self.value
    }

    /// Human-readable label: `fast_food` becomes `Fast Food`
    pub fn label(&self) -> String {
        humanize(&self.value)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{tag}={}", self.value),
            None => f.write_str(OTHER),
        }
    }
}

fn humanize(value: &str) -> String {
    value
        .split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
