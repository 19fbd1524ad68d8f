//! Upstream failure signalling.
//!
//! Every upstream client classifies HTTP status codes the same way and can
//! describe its errors as a [`FailureSignal`], the JSON shape returned to
//! callers when an authoritative provider fails.

use serde::Serialize;

/// How an upstream HTTP status should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx.
    Success,
    /// 401 or 403: the credential was rejected.
    Unauthorized,
    /// 429.
    RateLimited,
    /// Anything else.
    Other,
}

/// Classify an HTTP status code.
pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        401 | 403 => StatusClass::Unauthorized,
        429 => StatusClass::RateLimited,
        _ => StatusClass::Other,
    }
}

/// Failure result for an explicit upstream failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureSignal {
    /// Always `false`.
    pub success: bool,

    /// Description of what went wrong.
    pub error: String,

    /// Upstream HTTP status, when the failure came from one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl FailureSignal {
    /// Create a failure signal.
    pub fn new(error: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            success: false,
            error: error.into(),
            status_code,
        }
    }
}
