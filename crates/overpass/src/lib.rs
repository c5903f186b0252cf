//! Overpass API client for POI discovery
//!
//! This crate turns a center point and a category table into one Overpass
//! query, executes it, and parses the heterogeneous elements that come back.
//!
//! # Features
//!
//! - **Composite query builder**: `node` and `way` statements for every rule
//! - **Lenient parsing**: bad elements are dropped one by one
//! - **Soft failure**: [`OverpassClient::fetch_pois`] never errors
//! - **Request correlation**: every request carries an `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use meetpoint_core::category::CategoryTable;
//! use meetpoint_geo::Coordinate;
//! use meetpoint_overpass::{ClientConfig, OverpassClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OverpassClient::with_config(ClientConfig::from_env())?;
//!     let center = Coordinate::new(-6.2044, 106.8428);
//!
//!     let pois = client.fetch_pois(center, 2000.0, &CategoryTable::default()).await;
//!     println!("{} places nearby", pois.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod config;
mod error;
pub mod parse;
pub mod query;
mod source;

pub use client::OverpassClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use query::OverpassQuery;
pub use source::PoiSource;
