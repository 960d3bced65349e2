//! Error types for model registration and pipeline triggering.

use thiserror::Error;

/// Main error type for the registrar library.
#[derive(Debug, Error)]
pub enum RegistrarError {
    // Input errors
    #[error("Missing credential: {what} is required")]
    MissingCredential { what: String },

    #[error("Unknown model format for URI: {reference}")]
    UnresolvableFormat { reference: String },

    #[error("Storage key required for storage URI: {reference}")]
    MissingStorageKey { reference: String },

    #[error("Malformed metadata: {message}")]
    MalformedMetadata { message: String },

    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("{service} returned HTTP {status}: {message}")]
    Api {
        service: String,
        status: u16,
        message: String,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for registrar operations.
pub type Result<T> = std::result::Result<T, RegistrarError>;

impl From<serde_json::Error> for RegistrarError {
    fn from(err: serde_json::Error) -> Self {
        RegistrarError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for RegistrarError {
    fn from(err: reqwest::Error) -> Self {
        RegistrarError::Network {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl RegistrarError {
    /// Shorthand for a missing credential error.
    pub fn missing_credential(what: impl Into<String>) -> Self {
        RegistrarError::MissingCredential { what: what.into() }
    }

    /// Whether the error was caused by caller input rather than a remote service.
    ///
    /// Front ends use this to pick between "bad request" and "upstream failure".
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            RegistrarError::MissingCredential { .. }
                | RegistrarError::UnresolvableFormat { .. }
                | RegistrarError::MissingStorageKey { .. }
                | RegistrarError::MalformedMetadata { .. }
                | RegistrarError::Validation { .. }
        )
    }

    /// Convert to an HTTP status code for the pipeline service.
    pub fn to_http_status(&self) -> u16 {
        match self {
            RegistrarError::MissingCredential { .. } => 401,
            _ if self.is_caller_error() => 400,
            RegistrarError::Timeout(_) => 504,
            RegistrarError::Network { .. } | RegistrarError::Api { .. } => 502,
            _ => 500,
        }
    }
}
