//! Logging and discovery counters for Meetpoint
//!
//! - `init_with_config` installs the global `tracing` subscriber
//! - [`session_id`] tags every run so logs from one process can be grouped
//! - [`metrics`] counts discovery outcomes and keeps a rolling latency window

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

static METRICS: Lazy<MetricsRegistry> = Lazy::new(MetricsRegistry::new);

static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Latency samples kept per name; older ones are dropped first
pub const LATENCY_WINDOW: usize = 512;

/// Counter names recorded by the discovery engine
pub mod counters {
    /// A fetch result was applied to its session
    pub const DISCOVERY_APPLIED: &str = "discovery.applied";
    /// A fetch result arrived after a newer fetch started
    pub const DISCOVERY_STALE: &str = "discovery.stale";
    /// The map-data service was unavailable; an empty POI set was used
    pub const DISCOVERY_FAILED: &str = "discovery.failed";
    /// No participant locations, discovery skipped
    pub const DISCOVERY_SKIPPED: &str = "discovery.skipped";
    /// Participants dropped for invalid coordinates
    pub const PARTICIPANTS_EXCLUDED: &str = "participants.excluded";
    /// Latency of one POI fetch in milliseconds
    pub const FETCH_LATENCY_MS: &str = "discovery.fetch_latency_ms";
}

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`
    pub log_level: String,
    /// Print the event target
    pub show_target: bool,
    /// Print thread ids
    pub show_thread_ids: bool,
    /// Emit JSON lines instead of compact text
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_target: false,
            show_thread_ids: false,
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// Builder-style method to set the default filter directive
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Builder-style method to switch to JSON lines
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Install the subscriber. Logs always go to stderr.
///
/// Fails if a global subscriber is already set.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        let layer = fmt::layer()
            .json()
            .with_target(config.show_target)
            .with_writer(std::io::stderr);
        tracing::subscriber::set_global_default(registry.with(layer))
    } else {
        let layer = fmt::layer()
            .compact()
            .with_target(config.show_target)
            .with_thread_ids(config.show_thread_ids)
            .with_writer(std::io::stderr);
        tracing::subscriber::set_global_default(registry.with(layer))
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {e}"))?;

    tracing::debug!(session_id = %session_id(), version = env!("CARGO_PKG_VERSION"), "Telemetry initialized");
    Ok(())
}

/// Id shared by every log line of this process
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// The process-wide registry
pub fn metrics() -> &'static MetricsRegistry {
    &METRICS
}

/// Named counters plus bounded latency windows
pub struct MetricsRegistry {
    counters: RwLock<HashMap<&'static str, AtomicU64>>,
    latencies: Mutex<HashMap<&'static str, VecDeque<f64>>>,
    started: Instant,
}

impl MetricsRegistry {
    fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            latencies: Mutex::new(HashMap::new()),
            started: Instant::now(),
        }
    }

    /// Add one to a counter
    pub fn increment(&self, name: &'static str) {
        self.increment_by(name, 1);
    }

    /// Add `value` to a counter
    pub fn increment_by(&self, name: &'static str, value: u64) {
        if let Some(counter) = self.counters.read().unwrap_or_else(PoisonError::into_inner).get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
            return;
        }
        self.counters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(value, Ordering::Relaxed);
    }

    /// Current value of a counter, zero if never incremented
    pub fn counter(&self, name: &str) -> u64 {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// Record a latency sample in milliseconds
    pub fn observe(&self, name: &'static str, millis: f64) {
        let mut latencies = self.latencies.lock().unwrap_or_else(PoisonError::into_inner);
        let window = latencies.entry(name).or_default();
        if window.len() == LATENCY_WINDOW {
            window.pop_front();
        }
        window.push_back(millis);
    }

    /// Summary of the samples currently in a window
    pub fn latency(&self, name: &str) -> Option<LatencySummary> {
        let latencies = self.latencies.lock().unwrap_or_else(PoisonError::into_inner);
        latencies.get(name).and_then(|w| LatencySummary::from_samples(w.iter().copied()))
    }

    /// Point-in-time copy of everything recorded
    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.load(Ordering::Relaxed)))
            .collect();
        let latencies = self
            .latencies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|(name, window)| {
                LatencySummary::from_samples(window.iter().copied()).map(|s| ((*name).to_string(), s))
            })
            .collect();

        MetricsSnapshot {
            session_id: session_id().to_string(),
            uptime_secs: self.started.elapsed().as_secs(),
            counters,
            latencies,
        }
    }
}

/// Serializable view of the registry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Process session id
    pub session_id: String,
    /// Seconds since the registry was created
    pub uptime_secs: u64,
    /// Counter values by name
    pub counters: BTreeMap<String, u64>,
    /// Latency summaries by name
    pub latencies: BTreeMap<String, LatencySummary>,
}

/// Nearest-rank statistics over a latency window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    /// Number of samples
    pub samples: usize,
    /// Fastest sample
    pub min: f64,
    /// Slowest sample
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Median
    pub p50: f64,
    /// 95th percentile
    pub p95: f64,
}

impl LatencySummary {
    /// `None` for an empty window
    pub fn from_samples(samples: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut sorted: Vec<f64> = samples.into_iter().collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        Some(Self {
            samples: n,
            min: sorted[0],
            max: sorted[n - 1],
            mean: sorted.iter().sum::<f64>() / n as f64,
            p50: nearest_rank(&sorted, 50.0),
            p95: nearest_rank(&sorted, 95.0),
        })
    }
}

fn nearest_rank(sorted: &[f64], pct: f64) -> f64 {
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Measures one operation into a latency window.
///
/// Records once, on [`stop`](Self::stop) or on drop, whichever comes first.
pub struct Timer {
    name: &'static str,
    started: Option<Instant>,
}

impl Timer {
    /// Start timing `name`
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            started: Some(Instant::now()),
        }
    }

    /// Stop and record; returns the elapsed time
    pub fn stop(mut self) -> Duration {
        self.finish().unwrap_or_default()
    }

    fn finish(&mut self) -> Option<Duration> {
        let elapsed = self.started.take()?.elapsed();
        metrics().observe(self.name, elapsed.as_secs_f64() * 1000.0);
        Some(elapsed)
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.finish();
    }
}
