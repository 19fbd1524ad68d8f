//! Direct prediction HTTP client.

use std::time::Duration;

use crate::domain::{Arrival, StatusClass, classify_status};

use super::error::PredictionError;
use super::types::{PredictionDto, convert_predictions};

/// Default base URL for the prediction API.
const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default maximum number of arrivals returned.
const DEFAULT_MAX_RESULTS: usize = 10;

/// Configuration for the prediction client.
#[derive(Debug, Clone)]
pub struct PredictionConfig {
    /// API key sent as `app_key`. Optional: the API serves anonymous
    /// requests at a lower rate limit.
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of arrivals returned
    pub max_results: usize,
}

impl PredictionConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Authoritative stop-arrivals API client.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    max_results: usize,
}

impl PredictionClient {
    /// Create a new client with the given configuration.
    pub fn new(config: PredictionConfig) -> Result<Self, PredictionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = Some(config.api_key.trim().to_string()).filter(|k| !k.is_empty());

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            max_results: config.max_results,
        })
    }

    /// `{base}/StopPoint/{id}/Arrivals`, with the stop id as one encoded
    /// path segment.
    fn arrivals_url(&self, stop_id: &str) -> Result<reqwest::Url, PredictionError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| PredictionError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| PredictionError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["StopPoint", stop_id.trim(), "Arrivals"]);
        Ok(url)
    }

    /// Get predicted arrivals at a stop, soonest first.
    pub async fn get_arrivals(&self, stop_id: &str) -> Result<Vec<Arrival>, PredictionError> {
        let url = self.arrivals_url(stop_id)?;

        let mut request = self.http.get(url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("app_key", key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PredictionError::StopNotFound(stop_id.to_string()));
        }

        match classify_status(status.as_u16()) {
            StatusClass::Success => {}
            StatusClass::Unauthorized => return Err(PredictionError::Unauthorized),
            StatusClass::RateLimited => return Err(PredictionError::RateLimited),
            StatusClass::Other => {
                let body = response.text().await.unwrap_or_default();
                return Err(PredictionError::Api {
                    status: status.as_u16(),
                    message: body.chars().take(500).collect(),
                });
            }
        }

        let body = response.text().await?;

        let predictions: Vec<PredictionDto> =
            serde_json::from_str(&body).map_err(|e| PredictionError::Json {
                message: e.to_string(),
            })?;

        Ok(convert_predictions(predictions, self.max_results))
    }
}
