//! Core types for Meetpoint
//!
//! This crate provides the pieces shared by every stage of discovery:
//!
//! - **Points of interest**: kind-qualified ids, POIs, and ranked POIs
//! - **Categories**: the ordered allow-list used both to query and to group
//! - **Configuration**: TOML-based settings with validation
//! - **Error handling**: errors with codes, context, and recovery suggestions
//!
//! # Example
//!
//! ```rust
//! use meetpoint_core::{category::CategoryTable, config::Config};
//! use std::collections::BTreeMap;
//!
//! let config = Config::default();
//! assert_eq!(config.schema.discovery.radius_m, 2000.0);
//!
//! let mut tags = BTreeMap::new();
//! tags.insert("amenity".to_string(), "cafe".to_string());
//! assert_eq!(CategoryTable::default().classify(&tags).group_key(), "cafe");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod category;
pub mod config;
pub mod error;
pub mod poi;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::category::{Category, CategoryRule, CategoryTable};
    pub use crate::config::{Config, ConfigSchema, DiscoveryConfig, OverpassConfig};
    pub use crate::error::{Error, ErrorCode, Result, ResultExt};
    pub use crate::poi::{FeatureKind, PoiId, PointOfInterest, RankedPoi};
    pub use meetpoint_geo::{Coordinate, ParticipantLocation};
}
