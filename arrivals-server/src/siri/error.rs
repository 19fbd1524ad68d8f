//! Vehicle monitoring feed error types.

use crate::domain::FailureSignal;

/// Errors from the structured vehicle monitoring feed.
#[derive(Debug, thiserror::Error)]
pub enum SiriError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API key was missing from the configuration
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// The API key was rejected (401/403)
    #[error("unauthorized: check the vehicle monitoring API key")]
    Unauthorized,

    /// Rate limited by the API (429)
    #[error("rate limited by vehicle monitoring API")]
    RateLimited,

    /// API returned another non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body was not well-formed XML
    #[error("XML parse error: {0}")]
    Xml(String),
}

impl SiriError {
    /// The upstream HTTP status behind this error, if there was one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SiriError::Unauthorized => Some(401),
            SiriError::RateLimited => Some(429),
            SiriError::Api { status, .. } => Some(*status),
            SiriError::Http(e) => e.status().map(|s| s.as_u16()),
            SiriError::NotConfigured(_) | SiriError::Xml(_) => None,
        }
    }
}

impl From<&SiriError> for FailureSignal {
    fn from(err: &SiriError) -> Self {
        FailureSignal::new(err.to_string(), err.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SiriError::Api {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "API error 502: Bad Gateway");

        let err = SiriError::NotConfigured("FEED_API_KEY is not set".into());
        assert_eq!(err.to_string(), "not configured: FEED_API_KEY is not set");

        assert!(SiriError::Xml("unexpected end".into()).to_string().contains("XML"));
    }

    #[test]
    fn failure_signal() {
        let signal = FailureSignal::from(&SiriError::RateLimited);
        assert!(!signal.success);
        assert_eq!(signal.status_code, Some(429));

        let signal = FailureSignal::from(&SiriError::Xml("bad".into()));
        assert_eq!(signal.status_code, None);
    }
}
