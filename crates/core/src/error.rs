//! Structured errors with codes and recovery suggestions
//!
//! Every error carries an [`ErrorCode`] for programmatic handling, an optional
//! context line, and an optional suggestion shown to operators.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // IO errors (2xxx)
    /// Generic IO failure
    IoError = 2000,
    /// File missing
    FileNotFound = 2001,
    /// File present but unreadable
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    /// Generic configuration failure
    ConfigError = 3000,
    /// Explicitly requested config file is missing
    ConfigNotFound = 3001,
    /// Config file is not valid TOML/JSON
    ConfigParseError = 3002,
    /// A configured value is out of its allowed range
    InvalidConfigValue = 3004,

    // Validation errors (6xxx)
    /// Input failed validation
    InvalidInput = 6001,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self {
            Self::IoError | Self::FileNotFound | Self::PermissionDenied => "IO",
            Self::ConfigError
            | Self::ConfigNotFound
            | Self::ConfigParseError
            | Self::InvalidConfigValue => "Configuration",
            Self::InvalidInput => "Validation",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {ctx}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Generic configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Explicit config path does not exist
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a meetpoint.toml file or pass --config with a valid path")
    }

    /// A configuration field holds a value outside its allowed range
    pub fn invalid_value(field: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidConfigValue,
            format!("Invalid value for `{field}`: {}", message.into()),
        )
    }

    /// Caller-supplied input failed validation
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::InvalidInput, format!("JSON parse error: {err}")).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {err}"))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach a context line to the error, if any
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::InvalidConfigValue.to_string(), "E3004");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::ConfigParseError.category(), "Configuration");
        assert_eq!(ErrorCode::InvalidInput.category(), "Validation");
    }

    #[test]
    fn test_category_matches_code_range() {
        let all = [
            ErrorCode::IoError,
            ErrorCode::FileNotFound,
            ErrorCode::PermissionDenied,
            ErrorCode::ConfigError,
            ErrorCode::ConfigNotFound,
            ErrorCode::ConfigParseError,
            ErrorCode::InvalidConfigValue,
            ErrorCode::InvalidInput,
        ];
        for code in all {
            let expected = match code.code() / 1000 {
                2 => "IO",
                3 => "Configuration",
                6 => "Validation",
                other => panic!("{code} has no category range ({other}xxx)"),
            };
            assert_eq!(code.category(), expected);
        }
    }

    #[test]
    fn test_invalid_value_message() {
        let err = Error::invalid_value("discovery.radius_m", "must be positive, got -5");
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
        assert!(err.to_string().contains("discovery.radius_m"));
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("bad"));
        let err = result.context("While loading meetpoint.toml").unwrap_err();
        assert_eq!(err.context.as_deref(), Some("While loading meetpoint.toml"));
        assert!(err.to_string().contains("Context: While loading"));
    }
}
