//! Direct prediction API error types.

use crate::domain::FailureSignal;

/// Errors from the authoritative prediction API.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid API key or unauthorized
    #[error("unauthorized: check the prediction API key")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by prediction API")]
    RateLimited,

    /// The stop is unknown to the API
    #[error("stop not found: {0}")]
    StopNotFound(String),

    /// API returned another non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The configured base URL cannot carry a stop path
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
}

impl PredictionError {
    /// The upstream HTTP status behind this error, if there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PredictionError::Unauthorized => Some(401),
            PredictionError::RateLimited => Some(429),
            PredictionError::StopNotFound(_) => Some(404),
            PredictionError::Api { status, .. } => Some(*status),
            PredictionError::Http(e) => e.status().map(|s| s.as_u16()),
            PredictionError::Json { .. } | PredictionError::InvalidUrl(_) => None,
        }
    }
}

impl From<&PredictionError> for FailureSignal {
    fn from(err: &PredictionError) -> Self {
        FailureSignal::new(err.to_string(), err.status_code())
    }
}
