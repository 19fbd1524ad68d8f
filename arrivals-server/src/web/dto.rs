//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Arrival, Coordinate, Stop};
use crate::router::Provider;
use crate::service::RoutedArrivals;

/// Query for `GET /api/arrivals`.
///
/// Stop metadata comes from the caller's stop catalogue; only `stop_id` is
/// required. Without `lat`/`lon` the stop has no usable location and
/// estimation returns nothing.
#[derive(Debug, Deserialize)]
pub struct ArrivalsQuery {
    /// Stop identifier as the caller knows it
    pub stop_id: String,

    /// Public short code
    pub code: Option<String>,

    /// Latitude of the stop
    pub lat: Option<f64>,

    /// Longitude of the stop
    pub lon: Option<f64>,

    /// Stop name
    pub name: Option<String>,

    /// Region name, for routing
    pub region: Option<String>,

    /// Whether the stop is a group/parent stop
    #[serde(default)]
    pub group: bool,
}

impl ArrivalsQuery {
    /// Build the stop this query describes.
    pub fn to_stop(&self) -> Result<Stop, String> {
        let stop_id = self.stop_id.trim();
        if stop_id.is_empty() {
            return Err("stop_id must not be empty".to_string());
        }

        let location = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                    return Err(format!("Invalid coordinates: {lat},{lon}"));
                }
                Coordinate::new(lat, lon)
            }
            (None, None) => Coordinate::unknown(),
            _ => return Err("lat and lon must be given together".to_string()),
        };

        let mut stop = Stop::new(stop_id, location);
        if let Some(code) = self.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            stop = stop.with_short_code(code);
        }
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            stop = stop.with_name(name);
        }
        if self.group {
            stop = stop.as_group();
        }
        Ok(stop)
    }
}

/// Response for `GET /api/arrivals`.
#[derive(Debug, Serialize)]
pub struct ArrivalsResponse {
    /// Which provider served the request
    pub provider: Provider,

    /// Arrivals, soonest first
    pub arrivals: Vec<Arrival>,
}

impl From<RoutedArrivals> for ArrivalsResponse {
    fn from(routed: RoutedArrivals) -> Self {
        Self {
            provider: routed.provider,
            arrivals: routed.arrivals,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(lat: Option<f64>, lon: Option<f64>) -> ArrivalsQuery {
        ArrivalsQuery {
            stop_id: " 0100BRP90310 ".into(),
            code: Some("bstpgpt".into()),
            lat,
            lon,
            name: Some("Broadmead".into()),
            region: None,
            group: false,
        }
    }

    #[test]
    fn builds_stop() {
        let stop = query(Some(51.4545), Some(-2.5879)).to_stop().unwrap();
        assert_eq!(stop.id, "0100BRP90310");
        assert_eq!(stop.short_code.as_deref(), Some("bstpgpt"));
        assert_eq!(stop.name.as_deref(), Some("Broadmead"));
        assert!(stop.has_usable_location());
    }

    #[test]
    fn missing_location_is_unknown() {
        let stop = query(None, None).to_stop().unwrap();
        assert!(!stop.has_usable_location());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(query(Some(51.0), None).to_stop().is_err());
        assert!(query(Some(91.0), Some(0.0)).to_stop().is_err());

        let mut blank = query(None, None);
        blank.stop_id = "  ".into();
        assert!(blank.to_stop().is_err());
    }
}
