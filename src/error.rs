// src/error.rs

//! Unified error handling for the pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Delimited flat file could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Excel workbook could not be read
    #[error("Workbook error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Id pattern failed to compile
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A fetcher needs an API key that is not in the secrets file
    #[error("Missing API key '{0}' in api_keys.json")]
    MissingCredential(String),

    /// Upstream API reported an error in its payload
    #[error("{source_name} API error: {message}")]
    Api {
        source_name: String,
        message: String,
    },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an upstream API error.
    pub fn api(source_name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Api {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Network failures and 5xx answers are transient; 4xx answers and
    /// everything that happens after a body was received are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            Self::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_classify_by_code() {
        let server = AppError::HttpStatus {
            url: "https://api.census.gov".into(),
            status: 503,
        };
        let client = AppError::HttpStatus {
            url: "https://api.census.gov".into(),
            status: 404,
        };
        assert!(server.is_transient());
        assert!(!client.is_transient());
    }

    #[test]
    fn test_non_network_errors_are_not_transient() {
        assert!(!AppError::config("bad").is_transient());
        assert!(!AppError::MissingCredential("fred".into()).is_transient());
        assert!(!AppError::api("BEA", "table not found").is_transient());
    }

    #[test]
    fn test_display_messages() {
        let err = AppError::MissingCredential("census".into());
        assert_eq!(err.to_string(), "Missing API key 'census' in api_keys.json");

        let err = AppError::api("BLS", "REQUEST_NOT_PROCESSED");
        assert_eq!(err.to_string(), "BLS API error: REQUEST_NOT_PROCESSED");
    }
}
