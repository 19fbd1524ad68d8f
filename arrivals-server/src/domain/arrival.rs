//! Arrival prediction output type.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transport mode of an arriving vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Bus,
    Coach,
    Tram,
    Tube,
    Rail,
    Other,
}

impl TransportMode {
    /// Parse a mode name as published by the direct-prediction API.
    ///
    /// Unrecognised names map to [`TransportMode::Other`].
    pub fn from_mode_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "bus" => TransportMode::Bus,
            "coach" => TransportMode::Coach,
            "tram" => TransportMode::Tram,
            "tube" => TransportMode::Tube,
            "rail" | "overground" | "national-rail" | "elizabeth-line" | "dlr" => {
                TransportMode::Rail
            }
            _ => TransportMode::Other,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportMode::Bus => "bus",
            TransportMode::Coach => "coach",
            TransportMode::Tram => "tram",
            TransportMode::Tube => "tube",
            TransportMode::Rail => "rail",
            TransportMode::Other => "other",
        };
        f.write_str(s)
    }
}

/// A predicted or estimated arrival of a vehicle at a stop.
///
/// Lists of arrivals handed to callers are sorted ascending by
/// `time_to_station` and hold at most ten entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrival {
    /// Identifier for this prediction, unique within one response.
    pub id: String,

    /// Public line name (e.g. "38", "X5").
    pub line_name: String,

    /// Destination text shown on the vehicle.
    pub destination: String,

    /// Seconds until the vehicle reaches the stop. Never negative.
    pub time_to_station: u32,

    /// Absolute predicted arrival time.
    pub expected_arrival: DateTime<Utc>,

    /// Vehicle identifier.
    pub vehicle_id: String,

    /// Human-readable description of where the vehicle is now.
    pub current_location: String,

    /// Direction text (usually the destination).
    pub towards: String,

    pub mode: TransportMode,
}
