/*!
 * Error types for the lector application.
 *
 * This module contains custom error types for the collaborator clients and
 * the vocabulary core, using the thiserror crate for ergonomic error
 * definitions. Errors are mapped to an `ErrorKind` exactly once, at the
 * boundary where a caller needs to decide how to report them.
 */

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur when talking to an external service
/// (translation, OCR or tokenization backend)
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The backend is not available in this build or configuration
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Name of the error category, safe to show to end users.
    pub fn category(&self) -> &'static str {
        match self {
            Self::RequestFailed(_) => "RequestFailed",
            Self::ParseError(_) => "ParseError",
            Self::ApiError { .. } => "ApiError",
            Self::ConnectionError(_) => "ConnectionError",
            Self::AuthenticationError(_) => "AuthenticationError",
            Self::Unavailable(_) => "Unavailable",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Client-visible classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request itself was malformed (e.g. empty word)
    InvalidInput,
    /// An external backend failed
    ServiceUnavailable,
    /// The local store could not be read or written
    Storage,
    /// The addressed entry does not exist
    NotFound,
}

/// Errors surfaced by the vocabulary core
#[derive(Error, Debug)]
pub enum VocabularyError {
    /// Input rejected before any state change
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// External service failure; only the category is kept
    #[error("Service error: {category}")]
    ServiceUnavailable {
        /// Category name of the triggering provider error
        category: String,
    },

    /// Storage failure for the current operation
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    /// Entry not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl VocabularyError {
    /// Classify this error for the request layer
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::ServiceUnavailable { .. } => ErrorKind::ServiceUnavailable,
            Self::Storage(_) => ErrorKind::Storage,
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl From<ProviderError> for VocabularyError {
    fn from(error: ProviderError) -> Self {
        log::error!("External service failure: {}", error);
        Self::ServiceUnavailable {
            category: error.category().to_string(),
        }
    }
}

/// Result alias for vocabulary operations
pub type VocabularyResult<T> = Result<T, VocabularyError>;
