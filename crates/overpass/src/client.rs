//! Overpass HTTP client

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::parse::parse_response;
use crate::query::OverpassQuery;
use crate::source::PoiSource;
use meetpoint_core::category::CategoryTable;
use meetpoint_core::poi::PointOfInterest;
use meetpoint_geo::Coordinate;
use meetpoint_telemetry::{counters, metrics};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Overpass API client
///
/// One POST per fetch, no retries: a discovery cycle is superseded quickly
/// when participants change, and a retried answer would usually be stale.
#[derive(Clone)]
pub struct OverpassClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl OverpassClient {
    /// Create a new client with default configuration plus environment overrides
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::config(format!("invalid user agent `{}`", config.user_agent)))?;
        default_headers.insert(USER_AGENT, agent);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch POIs, reporting every failure.
    #[instrument(skip(self, categories), fields(request_id))]
    pub async fn try_fetch_pois(
        &self,
        center: Coordinate,
        radius_m: f64,
        categories: &CategoryTable,
    ) -> ApiResult<Vec<PointOfInterest>> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let query = OverpassQuery::new(center, radius_m, categories)
            .with_timeout(self.config.server_timeout_secs)
            .to_ql();

        let start = Instant::now();
        let response = self
            .inner
            .post(&self.config.endpoint)
            .header(X_REQUEST_ID, &request_id)
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(ApiError::api_response(status.as_u16(), body));
        }

        let pois = parse_response(&body, categories)?;
        debug!(
            pois = pois.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Overpass request succeeded"
        );
        Ok(pois)
    }

    /// Fetch POIs, degrading any failure to an empty list.
    pub async fn fetch_pois(
        &self,
        center: Coordinate,
        radius_m: f64,
        categories: &CategoryTable,
    ) -> Vec<PointOfInterest> {
        match self.try_fetch_pois(center, radius_m, categories).await {
            Ok(pois) => pois,
            Err(e) => {
                metrics().increment(counters::DISCOVERY_FAILED);
                warn!(
                    error = %e,
                    timeout = e.is_timeout(),
                    retryable = e.is_retryable(),
                    "POI discovery unavailable, continuing without places"
                );
                Vec::new()
            }
        }
    }

    fn classify(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.config.timeout)
        } else {
            ApiError::Request(e)
        }
    }
}

impl PoiSource for OverpassClient {
    fn fetch(
        &self,
        center: Coordinate,
        radius_m: f64,
        categories: &CategoryTable,
    ) -> impl Future<Output = Vec<PointOfInterest>> + Send {
        self.fetch_pois(center, radius_m, categories)
    }
}
