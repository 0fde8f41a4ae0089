//! YouTube client error types.

use thiserror::Error;
use ysent_models::LinkError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure talking to a Data API endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("YouTube API key not configured")]
    MissingApiKey,

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    pub fn status(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }

    pub fn invalid_response(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Server errors, throttling and network failures are worth another try.
    /// Quota and permission errors (403) are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            ApiError::Network(_) => true,
            _ => false,
        }
    }
}

/// A link that could not be mapped to a video or channel.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("Lookup for '{query}' failed: {source}")]
    LookupFailed {
        query: String,
        #[source]
        source: ApiError,
    },

    #[error("No channel found for '{0}'")]
    NotFound(String),

    #[error("Link does not point at a single video: {0}")]
    NotAVideo(String),
}

impl ResolutionError {
    pub fn lookup_failed(query: impl Into<String>, source: ApiError) -> Self {
        Self::LookupFailed {
            query: query.into(),
            source,
        }
    }
}
