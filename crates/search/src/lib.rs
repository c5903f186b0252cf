//! Text filtering over discovered places.
//!
//! Matching is case-insensitive against a place's name and its category
//! label. Results are ranked by match quality, then by distance.

mod error;
mod filter;

pub use error::{Result, SearchError};
pub use filter::{filter, match_tier, normalize_query, sort_by_distance_then_name, MatchTier};
