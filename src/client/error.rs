//! Failure taxonomy for lifelog requests.
//!
//! Every unsuccessful call surfaces as one [`LifelogFailure`]. Callers that
//! want to back off on rate limits match on [`LifelogFailure::RateLimited`]
//! (or ask [`LifelogFailure::is_rate_limited`]); the client itself never
//! retries.

use std::time::Duration;

use serde_json::{Map, Value};

/// Decoded JSON object from an error response body. Empty when the body was
/// not a JSON object.
pub type Payload = Map<String, Value>;

/// HTTP status used by the API to signal rate limiting.
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Errors raised by the transport before any HTTP status was received.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid request URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Everything that can go wrong when talking to the lifelog API.
#[derive(Debug, thiserror::Error)]
pub enum LifelogFailure {
    /// The client was constructed without an API key.
    #[error("api_key is required")]
    MissingApiKey,

    /// HTTP 429. `retry_after` is the server's hint in seconds, if it sent a
    /// usable one.
    #[error("rate limited: {message}")]
    RateLimited {
        status: u16,
        message: String,
        payload: Payload,
        retry_after: Option<u64>,
    },

    /// Any other HTTP status >= 400.
    #[error("API error ({status}): {message}")]
    ApiFailure {
        status: u16,
        message: String,
        payload: Payload,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A success response whose body was not valid JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LifelogFailure {
    /// HTTP status of the failed response, if one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RateLimited { status, .. } | Self::ApiFailure { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message. For HTTP failures this is the server's own
    /// message rather than the `Display` rendering.
    pub fn message(&self) -> String {
        match self {
            Self::RateLimited { message, .. } | Self::ApiFailure { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Self::RateLimited { payload, .. } | Self::ApiFailure { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
