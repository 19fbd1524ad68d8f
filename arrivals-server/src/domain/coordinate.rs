//! Geographic coordinate and bounding box types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo;

/// Kilometres per degree of latitude on the mean-radius sphere.
const KM_PER_DEGREE_LAT: f64 = 111.194_926_644_558_73;

/// A WGS84 latitude/longitude pair in decimal degrees.
///
/// `(0, 0)` is used throughout the upstream feeds as a placeholder for
/// "no fix", so it is treated as an unknown location rather than a point
/// in the Gulf of Guinea.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// The placeholder location used when a stop has no known position.
    pub fn unknown() -> Self {
        Self { lat: 0.0, lon: 0.0 }
    }

    /// Returns true if this coordinate can be used for geospatial estimation.
    ///
    /// Rejects the `(0, 0)` placeholder, non-finite values and values
    /// outside the valid latitude/longitude ranges.
    pub fn is_usable(&self) -> bool {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return false;
        }
        if self.lat == 0.0 && self.lon == 0.0 {
            return false;
        }
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Great-circle distance to another coordinate, in kilometres.
    pub fn distance_km_to(&self, other: &Coordinate) -> f64 {
        geo::distance_km(self.lat, self.lon, other.lat, other.lon)
    }

    /// Initial compass bearing towards another coordinate, in `[0, 360)`.
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        geo::bearing_degrees(self.lat, self.lon, other.lat, other.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// A lat/lon rectangle used to scope upstream feed queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Build a box extending `radius_km` north, south, east and west of `center`.
    ///
    /// The longitude span is widened by `1 / cos(lat)` so the box is roughly
    /// square on the ground. Near the poles the span is capped at the full
    /// longitude range.
    pub fn around(center: Coordinate, radius_km: f64) -> Self {
        let lat_delta = radius_km / KM_PER_DEGREE_LAT;
        let cos_lat = center.lat.to_radians().cos().abs();
        let lon_delta = if cos_lat < 1e-6 {
            180.0
        } else {
            (radius_km / (KM_PER_DEGREE_LAT * cos_lat)).min(180.0)
        };

        Self {
            min_lat: (center.lat - lat_delta).max(-90.0),
            min_lon: (center.lon - lon_delta).max(-180.0),
            max_lat: (center.lat + lat_delta).min(90.0),
            max_lon: (center.lon + lon_delta).min(180.0),
        }
    }

    /// Returns true if the coordinate lies inside the box (edges inclusive).
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }

    /// Format as the `minLon,minLat,maxLon,maxLat` query parameter both
    /// upstream feeds accept.
    pub fn to_query_param(&self) -> String {
        format!(
            "{:.6},{:.6},{:.6},{:.6}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}
