//! Vehicle position feed error types.

use crate::domain::FailureSignal;

/// Errors from the binary vehicle position feed.
#[derive(Debug, thiserror::Error)]
pub enum GtfsRtError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API key was missing from the configuration
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// The API key was rejected (401/403)
    #[error("unauthorized: check the vehicle position API key")]
    Unauthorized,

    /// Rate limited by the API (429)
    #[error("rate limited by vehicle position API")]
    RateLimited,

    /// API returned another non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The gateway returned an HTML page instead of a protobuf payload
    #[error("expected protobuf payload, got HTML")]
    HtmlPayload,

    /// The payload was not a valid feed message
    #[error("protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),
}

impl GtfsRtError {
    /// The upstream HTTP status behind this error, if there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GtfsRtError::Unauthorized => Some(401),
            GtfsRtError::RateLimited => Some(429),
            GtfsRtError::Api { status, .. } => Some(*status),
            GtfsRtError::Http(e) => e.status().map(|s| s.as_u16()),
            GtfsRtError::NotConfigured(_) | GtfsRtError::HtmlPayload | GtfsRtError::Decode(_) => {
                None
            }
        }
    }

    /// Returns true for payload problems, which mean "no data" rather than
    /// an upstream failure.
    pub fn is_malformed_payload(&self) -> bool {
        matches!(self, GtfsRtError::HtmlPayload | GtfsRtError::Decode(_))
    }
}

impl From<&GtfsRtError> for FailureSignal {
    fn from(err: &GtfsRtError) -> Self {
        FailureSignal::new(err.to_string(), err.status_code())
    }
}
