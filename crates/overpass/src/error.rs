//! Error types for the Overpass client

use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Overpass client errors
///
/// None of these escape [`OverpassClient::fetch_pois`](crate::OverpassClient::fetch_pois);
/// they exist for logging and for callers of the strict variant.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Payload was not the expected JSON shape
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Service returned a non-success status
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        message: String,
    },

    /// Request exceeded the caller-side bound
    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error, keeping at most 200 characters of the body
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        let message: String = message.into();
        let message = match message.char_indices().nth(200) {
            Some((cut, _)) => format!("{}...", &message[..cut]),
            None => message,
        };
        Self::ApiResponse { status, message }
    }

    /// Check if a later attempt could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            // Overpass answers 429 when the slot quota is used up and 504 when overloaded
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout(_) => true,
            Self::Config(_) | Self::Json(_) | Self::InvalidUrl(_) => false,
        }
    }

    /// Check if this error is a timeout of either kind
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Request(e) => e.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_retryable_statuses() {
        assert!(ApiError::api_response(429, "rate_limited").is_retryable());
        assert!(ApiError::api_response(504, "gateway timeout").is_retryable());
        assert!(!ApiError::api_response(400, "parse error").is_retryable());
        assert!(ApiError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(!ApiError::config("bad").is_retryable());
    }

    #[test]
    fn test_long_body_truncated() {
        let err = ApiError::api_response(500, "x".repeat(1000));
        match err {
            ApiError::ApiResponse { message, .. } => assert_eq!(message.len(), 203),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_timeout_display() {
        let err = ApiError::Timeout(Duration::from_secs(30));
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Request timeout after 30s");
    }
}
