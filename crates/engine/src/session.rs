//! Discovery sessions.
//!
//! A session runs one discovery cycle per participant change. Cycles are
//! numbered; when a fetch completes, its result is applied only if no newer
//! cycle has started and the session is still open. Older cycles are never
//! queued or awaited, they just lose.
//!
//! The state lock is held only for reads and swaps, never across the fetch.

use crate::pipeline::{aggregate, DiscoveryResult};
use meetpoint_core::config::DiscoveryConfig;
use meetpoint_geo::{centroid, sanitize, Coordinate, ParticipantLocation};
use meetpoint_overpass::PoiSource;
use meetpoint_telemetry::{counters, metrics, Timer};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// What the session currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No usable participants yet
    Empty,
    /// A fetch for `generation` is outstanding
    Discovering {
        /// Cycle number of the outstanding fetch
        generation: u64,
        /// Centroid the fetch was issued for
        centroid: Coordinate,
    },
    /// Latest applied result
    Ready(Arc<DiscoveryResult>),
}

impl SessionState {
    /// True while a fetch is outstanding
    pub fn is_discovering(&self) -> bool {
        matches!(self, Self::Discovering { .. })
    }

    /// The applied result, if any
    pub fn result(&self) -> Option<&Arc<DiscoveryResult>> {
        match self {
            Self::Ready(result) => Some(result),
            _ => None,
        }
    }
}

/// How a call to [`DiscoverySession::refresh`] ended
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// No valid participants; discovery was skipped
    DataInsufficient,
    /// The result became the session state
    Applied(Arc<DiscoveryResult>),
    /// A newer cycle started first; the result was discarded
    Stale {
        /// Cycle number of the discarded result
        generation: u64,
    },
    /// The session was closed; the result was discarded
    Closed,
}

enum Commit {
    Applied,
    Superseded,
    Closed,
}

/// Latest-fetch-wins discovery over a [`PoiSource`].
///
/// Sessions share nothing with each other; run as many as needed.
pub struct DiscoverySession<S> {
    source: S,
    config: DiscoveryConfig,
    generation: AtomicU64,
    closed: AtomicBool,
    state: RwLock<SessionState>,
}

impl<S: PoiSource> DiscoverySession<S> {
    /// Create a session after validating `config`
    pub fn new(source: S, config: DiscoveryConfig) -> meetpoint_core::Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            state: RwLock::new(SessionState::Empty),
        })
    }

    /// Discovery configuration in use
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Number of the most recently started cycle
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// True once [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Run a discovery cycle for `participants`.
    ///
    /// Starting a cycle invalidates any outstanding one. Participants with
    /// invalid coordinates are dropped and counted.
    pub async fn refresh(&self, participants: Vec<ParticipantLocation>) -> SessionOutcome {
        if self.is_closed() {
            return SessionOutcome::Closed;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let sanitized = sanitize(participants);
        if sanitized.excluded > 0 {
            metrics().increment_by(counters::PARTICIPANTS_EXCLUDED, sanitized.excluded as u64);
            debug!(generation, excluded = sanitized.excluded, "Dropped participants with invalid coordinates");
        }

        let Some(center) = centroid(&sanitized.valid) else {
            metrics().increment(counters::DISCOVERY_SKIPPED);
            debug!(generation, "No valid participants, skipping discovery");
            return match self.commit(generation, SessionState::Empty) {
                Commit::Applied => SessionOutcome::DataInsufficient,
                Commit::Superseded => self.stale(generation),
                Commit::Closed => SessionOutcome::Closed,
            };
        };

        match self.commit(generation, SessionState::Discovering { generation, centroid: center }) {
            Commit::Applied => {}
            Commit::Superseded => return self.stale(generation),
            Commit::Closed => return SessionOutcome::Closed,
        }
        debug!(generation, lat = center.latitude, lon = center.longitude, "Discovery started");

        let timer = Timer::start(counters::FETCH_LATENCY_MS);
        let pois = self.source.fetch(center, self.config.radius_m, &self.config.categories).await;
        let elapsed = timer.stop();

        let mut result = aggregate(center, &self.config, pois, &sanitized.valid);
        result.excluded_participants = sanitized.excluded;
        let result = Arc::new(result);

        match self.commit(generation, SessionState::Ready(Arc::clone(&result))) {
            Commit::Applied => {
                metrics().increment(counters::DISCOVERY_APPLIED);
                info!(
                    generation,
                    groups = result.groups.len(),
                    pois = result.total_pois,
                    elapsed_ms = elapsed.as_millis(),
                    "Discovery applied"
                );
                SessionOutcome::Applied(result)
            }
            Commit::Superseded => self.stale(generation),
            Commit::Closed => {
                debug!(generation, "Discarding result for closed session");
                SessionOutcome::Closed
            }
        }
    }

    /// Tear the session down; outstanding results are discarded.
    pub fn close(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        self.closed.store(true, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        *state = SessionState::Empty;
    }

    /// Swap in `next` if `generation` is still current.
    ///
    /// The check happens under the write lock, so a superseded cycle can
    /// never overwrite the state of a newer one.
    fn commit(&self, generation: u64, next: SessionState) -> Commit {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.closed.load(Ordering::SeqCst) {
            return Commit::Closed;
        }
        if self.generation.load(Ordering::SeqCst) != generation {
            return Commit::Superseded;
        }
        *state = next;
        Commit::Applied
    }

    fn stale(&self, generation: u64) -> SessionOutcome {
        metrics().increment(counters::DISCOVERY_STALE);
        debug!(generation, current = self.generation(), "Discarding stale discovery result");
        SessionOutcome::Stale { generation }
    }
}
