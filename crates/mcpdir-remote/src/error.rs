//! Internal error types for remote operations.
//!
//! These errors are internal to `mcpdir-remote` and are mapped to core port
//! errors at the boundary.

use mcpdir_core::{CoreError, TierError};
use thiserror::Error;

/// Result type alias for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// Request failed with an HTTP error status (after retries, if retryable).
    #[error("request failed with status {status}: {url}")]
    RequestFailed { status: u16, url: String },

    /// The response could not be understood.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl RemoteError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// HTTP status, when the server answered at all.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<RemoteError> for CoreError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::InvalidUrl(e) => Self::Configuration(format!("invalid URL: {e}")),
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<RemoteError> for TierError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::InvalidResponse { message } => Self::InvalidResponse(message),
            RemoteError::JsonParse(e) => Self::InvalidResponse(e.to_string()),
            RemoteError::InvalidUrl(e) => Self::NotApplicable(format!("invalid URL: {e}")),
            other => Self::Http(other.to_string()),
        }
    }
}
