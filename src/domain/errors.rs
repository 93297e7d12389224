//! Domain error types
//!
//! This module defines the error hierarchy for Conduit.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Conduit error type
///
/// This is the primary error type used throughout the crate.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ConduitError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failures talking to the vendor API
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ConduitError {
    /// HTTP status carried by the error, if it came from a non-success response
    pub fn status(&self) -> Option<u16> {
        match self {
            ConduitError::Client(ClientError::HttpStatus { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Vendor API client errors
///
/// Errors that occur when calling the EHR vendor's REST endpoints.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to connect to the vendor endpoint
    #[error("Failed to connect to vendor endpoint: {0}")]
    ConnectionFailed(String),

    /// Non-success HTTP status
    #[error("Request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// No endpoint is configured for the tenant
    #[error("Unknown tenant: {0}")]
    UnknownTenant(String),

    /// Request URL could not be built
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Continuation chain exceeded the configured page cap
    #[error("Search exceeded the page limit of {limit} pages: {path}")]
    PageLimitExceeded { limit: usize, path: String },
}

impl ClientError {
    /// Whether the transport should retry a request that failed with this error
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::ConnectionFailed(_) | ClientError::Timeout(_) => true,
            ClientError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ConduitError {
    fn from(err: std::io::Error) -> Self {
        ConduitError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ConduitError {
    fn from(err: serde_json::Error) -> Self {
        ConduitError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ConduitError {
    fn from(err: toml::de::Error) -> Self {
        ConduitError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conduit_error_display() {
        let err = ConduitError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_client_error_conversion() {
        let client_err = ClientError::ConnectionFailed("Network error".to_string());
        let err: ConduitError = client_err.into();
        assert!(matches!(err, ConduitError::Client(_)));
    }

    #[test]
    fn test_http_status_carries_status_and_body() {
        let err: ConduitError = ClientError::HttpStatus {
            status: 403,
            body: "forbidden".to_string(),
        }
        .into();

        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("forbidden"));
    }

    #[test]
    fn test_status_absent_for_other_errors() {
        let err = ConduitError::Validation("bad".to_string());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_retryable_classification() {
        let server = ClientError::HttpStatus {
            status: 503,
            body: String::new(),
        };
        let throttled = ClientError::HttpStatus {
            status: 429,
            body: String::new(),
        };
        let not_found = ClientError::HttpStatus {
            status: 404,
            body: String::new(),
        };

        assert!(server.is_retryable());
        assert!(throttled.is_retryable());
        assert!(!not_found.is_retryable());
        assert!(ClientError::ConnectionFailed("reset".to_string()).is_retryable());
        assert!(!ClientError::InvalidResponse("eof".to_string()).is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ConduitError = io_err.into();
        assert!(matches!(err, ConduitError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ConduitError = json_err.into();
        assert!(matches!(err, ConduitError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ConduitError = toml_err.into();
        assert!(matches!(err, ConduitError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
