//! Meeting-point discovery.
//!
//! [`pipeline`] turns a centroid, participants and fetched places into a
//! grouped, ranked [`DiscoveryResult`]. [`DiscoverySession`] drives repeated
//! discovery cycles and applies only the newest one.
//!
//! # Example
//!
//! ```no_run
//! use meetpoint_core::config::DiscoveryConfig;
//! use meetpoint_engine::{DiscoverySession, SessionOutcome};
//! use meetpoint_geo::ParticipantLocation;
//! use meetpoint_overpass::OverpassClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let session = DiscoverySession::new(OverpassClient::new()?, DiscoveryConfig::default())?;
//! let outcome = session
//!     .refresh(vec![
//!         ParticipantLocation::new(-6.2088, 106.8456),
//!         ParticipantLocation::new(-6.2000, 106.8400),
//!     ])
//!     .await;
//!
//! if let SessionOutcome::Applied(result) = outcome {
//!     println!("{}", result.summary());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod pipeline;
pub mod session;

pub use pipeline::{aggregate, format_distance, CategoryGroup, DiscoveryResult, ParticipantStatus};
pub use session::{DiscoverySession, SessionOutcome, SessionState};
