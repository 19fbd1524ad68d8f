//! Tunable policy for arrival estimation.

use chrono::{DateTime, Utc};

use crate::geo::DEFAULT_HEADING_TOLERANCE_DEG;

/// Reports older than this are treated as out of service.
pub const DEFAULT_FRESHNESS_SECS: i64 = 300;

/// Vehicles closer than this are treated as parked at the stop.
pub const DEFAULT_MIN_DISTANCE_KM: f64 = 0.05;

/// Radius of the feed query and the binary estimator's distance cut-off.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 10.0;

/// Assumed urban bus speed when a call carries no time.
pub const DEFAULT_STRUCTURED_SPEED_KMH: f64 = 15.0;

/// Assumed average speed for position-only estimates.
pub const DEFAULT_BINARY_SPEED_KMH: f64 = 20.0;

/// Ceiling for estimates taken from published call times.
pub const DEFAULT_TIMED_HORIZON_SECS: u32 = 3600;

/// Ceiling for estimates computed from distance alone.
pub const DEFAULT_GEOSPATIAL_HORIZON_SECS: u32 = 1800;

/// Maximum arrivals returned per stop.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Per-tier timeouts applied by the pipeline around each fetch.
pub const DEFAULT_STRUCTURED_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_BINARY_TIMEOUT_SECS: u64 = 20;

/// Named constants governing both estimators.
#[derive(Debug, Clone)]
pub struct EstimatorPolicy {
    /// Maximum age of a vehicle report (seconds).
    pub freshness_secs: i64,

    /// Maximum angle between a vehicle's heading and the bearing to the stop.
    pub heading_tolerance_deg: f64,

    /// Vehicles nearer than this (km) are ignored by the binary estimator.
    pub min_distance_km: f64,

    /// Search radius (km) for feed queries and the binary distance filter.
    pub search_radius_km: f64,

    /// Speed (km/h) for the structured estimator's distance fallback.
    pub structured_speed_kmh: f64,

    /// Speed (km/h) for binary feed estimates.
    pub binary_speed_kmh: f64,

    /// Ceiling (seconds) for estimates from expected or aimed times.
    pub timed_horizon_secs: u32,

    /// Ceiling (seconds) for estimates from distance and speed.
    pub geospatial_horizon_secs: u32,

    /// Maximum arrivals returned.
    pub max_results: usize,

    /// Discard binary feed reports that carry no bearing.
    pub require_bearing: bool,

    /// Timeout (seconds) for the structured tier.
    pub structured_timeout_secs: u64,

    /// Timeout (seconds) for the binary tier.
    pub binary_timeout_secs: u64,
}

impl EstimatorPolicy {
    /// Returns true if a report recorded at `recorded_at` is too old.
    ///
    /// Reports without a timestamp are kept. Timestamps in the future
    /// count as age zero.
    pub fn is_stale(&self, recorded_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match recorded_at {
            Some(at) => (now - at).num_seconds().max(0) > self.freshness_secs,
            None => false,
        }
    }

    /// Seconds to cover `distance_km` at `speed_kmh`, rounded.
    pub fn travel_secs(distance_km: f64, speed_kmh: f64) -> f64 {
        (distance_km / speed_kmh * 3600.0).round()
    }

    pub fn structured_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.structured_timeout_secs)
    }

    pub fn binary_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.binary_timeout_secs)
    }
}

impl Default for EstimatorPolicy {
    fn default() -> Self {
        Self {
            freshness_secs: DEFAULT_FRESHNESS_SECS,
            heading_tolerance_deg: DEFAULT_HEADING_TOLERANCE_DEG,
            min_distance_km: DEFAULT_MIN_DISTANCE_KM,
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            structured_speed_kmh: DEFAULT_STRUCTURED_SPEED_KMH,
            binary_speed_kmh: DEFAULT_BINARY_SPEED_KMH,
            timed_horizon_secs: DEFAULT_TIMED_HORIZON_SECS,
            geospatial_horizon_secs: DEFAULT_GEOSPATIAL_HORIZON_SECS,
            max_results: DEFAULT_MAX_RESULTS,
            require_bearing: true,
            structured_timeout_secs: DEFAULT_STRUCTURED_TIMEOUT_SECS,
            binary_timeout_secs: DEFAULT_BINARY_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_773_568_800, 0).unwrap()
    }

    #[test]
    fn default_values() {
        let policy = EstimatorPolicy::default();
        assert_eq!(policy.freshness_secs, 300);
        assert_eq!(policy.heading_tolerance_deg, 60.0);
        assert_eq!(policy.max_results, 10);
        assert!(policy.require_bearing);
        assert_eq!(policy.structured_timeout().as_secs(), 15);
        assert_eq!(policy.binary_timeout().as_secs(), 20);
    }

    #[test]
    fn staleness_boundary() {
        let policy = EstimatorPolicy::default();
        assert!(!policy.is_stale(Some(now() - Duration::seconds(300)), now()));
        assert!(policy.is_stale(Some(now() - Duration::seconds(301)), now()));
    }

    #[test]
    fn missing_and_future_timestamps_are_fresh() {
        let policy = EstimatorPolicy::default();
        assert!(!policy.is_stale(None, now()));
        assert!(!policy.is_stale(Some(now() + Duration::seconds(900)), now()));
    }

    #[test]
    fn travel_time() {
        assert_eq!(EstimatorPolicy::travel_secs(2.0, 20.0), 360.0);
        assert_eq!(EstimatorPolicy::travel_secs(1.0, 15.0), 240.0);
    }
}
