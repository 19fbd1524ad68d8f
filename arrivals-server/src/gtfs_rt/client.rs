//! Vehicle position HTTP client.
//!
//! Fetches protobuf vehicle position feeds, either scoped to a bounding box
//! or, for gateways that only support operator-scoped queries, by iterating
//! a fixed list of operator codes and merging the results.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{BoundingBox, StatusClass, VehicleReport, classify_status};

use super::decode::decode_vehicle_reports;
use super::error::GtfsRtError;

/// Default base URL for the vehicle position feed.
const DEFAULT_BASE_URL: &str = "https://data.bus-data.dft.gov.uk/api/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Stop querying further operators once this many nearby vehicles are known.
const DEFAULT_ENOUGH_VEHICLES: usize = 50;

/// Allowance on top of the summed request timeouts for decoding and merging.
const FETCH_BUDGET_SLACK: Duration = Duration::from_secs(1);

/// How the feed is scoped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    /// One request with a `boundingBox` parameter.
    BoundingBox,
    /// One request per operator code, in order.
    Operators(Vec<String>),
}

/// Configuration for the vehicle position client.
#[derive(Debug, Clone)]
pub struct GtfsRtConfig {
    /// API key sent as the `api_key` query parameter. Empty means unset.
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Query scoping
    pub mode: QueryMode,
    /// Operator mode short-circuit threshold
    pub enough_vehicles: usize,
}

impl GtfsRtConfig {
    /// Create a new bounding-box config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mode: QueryMode::BoundingBox,
            enough_vehicles: DEFAULT_ENOUGH_VEHICLES,
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

    /// Query by operator code instead of bounding box.
    ///
    /// Blank codes are dropped. An empty list falls back to bounding-box mode.
    pub fn with_operators<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes: Vec<String> = codes
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        self.mode = if codes.is_empty() {
            QueryMode::BoundingBox
        } else {
            QueryMode::Operators(codes)
        };
        self
    }

    /// Set the operator-mode short-circuit threshold.
    pub fn with_enough_vehicles(mut self, n: usize) -> Self {
        self.enough_vehicles = n;
        self
    }

    /// Returns true if an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Vehicle position API client.
#[derive(Debug, Clone)]
pub struct GtfsRtClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    mode: QueryMode,
    enough_vehicles: usize,
}

impl GtfsRtClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GtfsRtConfig) -> Result<Self, GtfsRtError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        let api_key = config
            .is_configured()
            .then(|| config.api_key.trim().to_string());

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
            mode: config.mode,
            enough_vehicles: config.enough_vehicles.max(1),
        })
    }

    /// Upper bound on one call to [`get_vehicle_positions`](Self::get_vehicle_positions).
    ///
    /// Every request is bounded by the client timeout, and operator mode
    /// makes one request per operator in sequence.
    pub fn fetch_budget(&self) -> Duration {
        let requests = match &self.mode {
            QueryMode::BoundingBox => 1,
            QueryMode::Operators(codes) => u32::try_from(codes.len()).unwrap_or(u32::MAX),
        };
        self.timeout.saturating_mul(requests) + FETCH_BUDGET_SLACK
    }

    /// Fetch vehicle positions relevant to a bounding box.
    ///
    /// In operator mode the results of each operator query are merged
    /// (first report per vehicle wins) and filtered to the bounding box. A
    /// failing operator is skipped; the call only fails if every operator
    /// failed.
    pub async fn get_vehicle_positions(
        &self,
        bbox: &BoundingBox,
    ) -> Result<Vec<VehicleReport>, GtfsRtError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GtfsRtError::NotConfigured("vehicle position API key".to_string()))?;

        let codes = match &self.mode {
            QueryMode::BoundingBox => {
                return self
                    .fetch(api_key, ("boundingBox", bbox.to_query_param()))
                    .await;
            }
            QueryMode::Operators(codes) => codes,
        };

        let mut merged = Vec::new();
        let mut seen = HashSet::new();
        let mut last_error = None;
        let mut any_succeeded = false;

        for code in codes {
            match self.fetch(api_key, ("operatorRef", code.clone())).await {
                Ok(reports) => {
                    any_succeeded = true;
                    for report in reports {
                        if bbox.contains(&report.position) && seen.insert(report.vehicle_id.clone())
                        {
                            merged.push(report);
                        }
                    }
                }
                Err(e) => {
                    warn!(operator = %code, error = %e, "operator vehicle query failed");
                    last_error = Some(e);
                }
            }

            if merged.len() >= self.enough_vehicles {
                debug!(
                    operator = %code,
                    vehicles = merged.len(),
                    "collected enough vehicles, skipping remaining operators"
                );
                break;
            }
        }

        match last_error {
            Some(e) if !any_succeeded => Err(e),
            _ => Ok(merged),
        }
    }

    /// One feed request. Malformed payloads are reported as "no data".
    async fn fetch(
        &self,
        api_key: &str,
        scope: (&str, String),
    ) -> Result<Vec<VehicleReport>, GtfsRtError> {
        let url = format!("{}/gtfsrtdatafeed/", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[scope, ("api_key", api_key.to_string())])
            .send()
            .await?;

        let status = response.status();

        match classify_status(status.as_u16()) {
            StatusClass::Success => {}
            StatusClass::Unauthorized => return Err(GtfsRtError::Unauthorized),
            StatusClass::RateLimited => return Err(GtfsRtError::RateLimited),
            StatusClass::Other => {
                let body = response.text().await.unwrap_or_default();
                return Err(GtfsRtError::Api {
                    status: status.as_u16(),
                    message: body.chars().take(500).collect(),
                });
            }
        }

        let bytes = response.bytes().await?;

        match decode_vehicle_reports(&bytes) {
            Ok(reports) => Ok(reports),
            Err(e) if e.is_malformed_payload() => {
                warn!(error = %e, bytes = bytes.len(), "unusable vehicle position payload, treating as no data");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;
    use crate::domain::Coordinate;
    use crate::gtfs_rt::test_server::{BBOX_SCOPE, Reply, spawn_feed_server};
    use crate::gtfs_rt::{test_feed, test_vehicle_entity};

    const CENTER_LAT: f32 = 51.4545;
    const CENTER_LON: f32 = -2.5879;

    fn bbox() -> BoundingBox {
        BoundingBox::around(
            Coordinate::new(f64::from(CENTER_LAT), f64::from(CENTER_LON)),
            10.0,
        )
    }

    /// A feed payload with one nearby vehicle per id.
    fn nearby(ids: &[&str]) -> Reply {
        let entities = ids
            .iter()
            .map(|id| test_vehicle_entity(id, CENTER_LAT, CENTER_LON, Some(90.0), None, Some("72")))
            .collect();
        Reply::Feed(test_feed(entities, Some(1_773_568_800)).encode_to_vec())
    }

    fn operator_client(base_url: &str, operators: &[&str]) -> GtfsRtClient {
        GtfsRtClient::new(
            GtfsRtConfig::new("key")
                .with_base_url(base_url)
                .with_timeout(1)
                .with_operators(operators.iter().copied()),
        )
        .unwrap()
    }

    fn ids(reports: &[VehicleReport]) -> Vec<&str> {
        reports.iter().map(|r| r.vehicle_id.as_str()).collect()
    }

    #[tokio::test]
    async fn html_payload_is_no_data() {
        let server = spawn_feed_server([(BBOX_SCOPE, Reply::Html)]).await;
        let client =
            GtfsRtClient::new(GtfsRtConfig::new("key").with_base_url(&server.base_url)).unwrap();

        let reports = client.get_vehicle_positions(&bbox()).await.unwrap();
        assert!(reports.is_empty());
        assert_eq!(server.hits(), vec![BBOX_SCOPE.to_string()]);
    }

    #[tokio::test]
    async fn undecodable_payload_is_no_data() {
        let server = spawn_feed_server([(BBOX_SCOPE, Reply::Feed(vec![0xFF, 0xFE, 0x00, 0x01]))]).await;
        let client =
            GtfsRtClient::new(GtfsRtConfig::new("key").with_base_url(&server.base_url)).unwrap();

        assert!(client.get_vehicle_positions(&bbox()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bbox_mode_status_errors() {
        let server = spawn_feed_server([(BBOX_SCOPE, Reply::Status(429))]).await;
        let client =
            GtfsRtClient::new(GtfsRtConfig::new("key").with_base_url(&server.base_url)).unwrap();

        let result = client.get_vehicle_positions(&bbox()).await;
        assert!(matches!(result, Err(GtfsRtError::RateLimited)));
    }

    #[tokio::test]
    async fn operators_merge_first_report_wins_within_bbox() {
        let far_away = test_vehicle_entity("far", 53.48, -2.24, Some(90.0), None, Some("X1"));
        let mut moved = test_vehicle_entity("shared", CENTER_LAT + 0.01, CENTER_LON, None, None, None);
        moved.id = "second-copy".into();
        let second = Reply::Feed(test_feed(vec![moved, far_away], None).encode_to_vec());

        let server = spawn_feed_server([("A", nearby(&["shared", "a1"])), ("B", second)]).await;
        let client = operator_client(&server.base_url, &["A", "B"]);

        let reports = client.get_vehicle_positions(&bbox()).await.unwrap();
        assert_eq!(ids(&reports), vec!["shared", "a1"]);
        // The copy from A is kept, not B's
        assert_eq!(reports[0].bearing, Some(90.0));
        assert_eq!(server.hits(), vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn stops_querying_once_enough_vehicles() {
        let server = spawn_feed_server([("A", nearby(&["a1"])), ("B", nearby(&["b1"]))]).await;
        let client = GtfsRtClient::new(
            GtfsRtConfig::new("key")
                .with_base_url(&server.base_url)
                .with_operators(["A", "B"])
                .with_enough_vehicles(1),
        )
        .unwrap();

        let reports = client.get_vehicle_positions(&bbox()).await.unwrap();
        assert_eq!(ids(&reports), vec!["a1"]);
        assert_eq!(server.hits(), vec!["A".to_string()]);
    }

    #[tokio::test]
    async fn failing_operator_is_skipped() {
        let server = spawn_feed_server([
            ("A", Reply::Status(500)),
            ("B", nearby(&["b1"])),
            ("C", Reply::Html),
        ])
        .await;
        let client = operator_client(&server.base_url, &["A", "B", "C"]);

        let reports = client.get_vehicle_positions(&bbox()).await.unwrap();
        assert_eq!(ids(&reports), vec!["b1"]);
        assert_eq!(server.hits().len(), 3);
    }

    #[tokio::test]
    async fn hanging_operator_keeps_earlier_vehicles() {
        let server = spawn_feed_server([("A", nearby(&["a1"])), ("B", Reply::Hang)]).await;
        let client = operator_client(&server.base_url, &["A", "B"]);

        let reports = client.get_vehicle_positions(&bbox()).await.unwrap();
        assert_eq!(ids(&reports), vec!["a1"]);
    }

    #[tokio::test]
    async fn every_operator_failing_is_an_error() {
        let server = spawn_feed_server([("A", Reply::Status(500)), ("B", Reply::Status(401))]).await;
        let client = operator_client(&server.base_url, &["A", "B"]);

        let result = client.get_vehicle_positions(&bbox()).await;
        assert!(matches!(result, Err(GtfsRtError::Unauthorized)));
    }

    #[test]
    fn fetch_budget_covers_every_request() {
        let client = GtfsRtClient::new(GtfsRtConfig::new("k").with_timeout(20)).unwrap();
        assert_eq!(client.fetch_budget(), Duration::from_secs(21));

        let client = GtfsRtClient::new(
            GtfsRtConfig::new("k")
                .with_timeout(20)
                .with_operators(["A", "B", "C"]),
        )
        .unwrap();
        assert_eq!(client.fetch_budget(), Duration::from_secs(61));
    }

    #[test]
    fn config_defaults() {
        let config = GtfsRtConfig::new("test-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.mode, QueryMode::BoundingBox);
        assert_eq!(config.enough_vehicles, DEFAULT_ENOUGH_VEHICLES);
    }

    #[test]
    fn operator_mode() {
        let config = GtfsRtConfig::new("k").with_operators(["FBRI", " ", "SCGH "]);
        assert_eq!(
            config.mode,
            QueryMode::Operators(vec!["FBRI".to_string(), "SCGH".to_string()])
        );

        let config = GtfsRtConfig::new("k").with_operators(Vec::<String>::new());
        assert_eq!(config.mode, QueryMode::BoundingBox);
    }

    #[test]
    fn config_builder() {
        let config = GtfsRtConfig::new("k")
            .with_base_url("http://localhost:9000")
            .with_timeout(3)
            .with_enough_vehicles(5);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.enough_vehicles, 5);
    }

    #[tokio::test]
    async fn missing_key_short_circuits() {
        let client =
            GtfsRtClient::new(GtfsRtConfig::new("").with_base_url("http://192.0.2.1:9")).unwrap();
        let bbox = BoundingBox::around(Coordinate::new(51.45, -2.58), 10.0);

        let result = client.get_vehicle_positions(&bbox).await;
        assert!(matches!(result, Err(GtfsRtError::NotConfigured(_))));
    }
}
