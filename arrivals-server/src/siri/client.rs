//! Vehicle monitoring HTTP client.
//!
//! Fetches a bounding-box scoped vehicle monitoring delivery and decodes it
//! into [`VehicleActivity`] records.

use std::time::Duration;

use crate::domain::{BoundingBox, StatusClass, classify_status};

use super::error::SiriError;
use super::parse::parse_vehicle_monitoring;
use super::types::VehicleActivity;

/// Default base URL for the vehicle monitoring feed.
const DEFAULT_BASE_URL: &str = "https://data.bus-data.dft.gov.uk/api/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for the vehicle monitoring client.
#[derive(Debug, Clone)]
pub struct SiriConfig {
    /// API key sent as the `api_key` query parameter. Empty means unset.
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SiriConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
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

    /// Returns true if an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Vehicle monitoring API client.
#[derive(Debug, Clone)]
pub struct SiriClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl SiriClient {
    /// Create a new client with the given configuration.
    ///
    /// A missing API key is not an error here; every fetch short-circuits
    /// with [`SiriError::NotConfigured`] instead, so the rest of the service
    /// can still run.
    pub fn new(config: SiriConfig) -> Result<Self, SiriError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = config
            .is_configured()
            .then(|| config.api_key.trim().to_string());

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Fetch vehicle activity inside a bounding box.
    pub async fn get_vehicle_activity(
        &self,
        bbox: &BoundingBox,
    ) -> Result<Vec<VehicleActivity>, SiriError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SiriError::NotConfigured("vehicle monitoring API key".to_string()))?;

        let url = format!("{}/datafeed/", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("boundingBox", bbox.to_query_param()),
                ("api_key", api_key.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        match classify_status(status.as_u16()) {
            StatusClass::Success => {}
            StatusClass::Unauthorized => return Err(SiriError::Unauthorized),
            StatusClass::RateLimited => return Err(SiriError::RateLimited),
            StatusClass::Other => {
                let body = response.text().await.unwrap_or_default();
                return Err(SiriError::Api {
                    status: status.as_u16(),
                    message: body.chars().take(500).collect(),
                });
            }
        }

        let body = response.text().await?;
        parse_vehicle_monitoring(&body)
    }
}
